//! Ping command - liveness check

/// Execute the ping command
pub fn execute() -> String {
    format!("pong {}", chrono::Utc::now().timestamp())
}
