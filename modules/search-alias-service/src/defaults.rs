//! Built-in search targets.

/// Where queries that match no command and no bookmark are sent.
pub const DEFAULT_URL: &str = "https://www.google.com/search?q=%s&btnK";

/// Search suggestion endpoint advertised in the OpenSearch descriptor.
pub const DEFAULT_SUGGEST_URL: &str =
    "https://suggestqueries.google.com/complete/search?client=firefox&q=%s";

/// Bookmarks seeded into an empty registry on first start.
pub const DEFAULT_BOOKMARKS: &[(&str, &str)] = &[
    ("g", "https://www.google.com/search?q=%s&btnK"),
    ("gl", "https://www.google.com/search?q=%s&btnI"),
    ("gh", "https://github.com/search?q=%s&ref=opensearch"),
    ("go", "https://golang.org/search?q=%s"),
    ("wp", "http://en.wikipedia.org/?search=%s"),
    ("py", "https://docs.python.org/2/search.html?q=%s"),
    ("py3", "https://docs.python.org/3/search.html?q=%s"),
    (
        "yt",
        "http://www.youtube.com/results?search_type=search_videos&search_sort=relevance&search_query=%s&search=Search",
    ),
    ("gim", "https://www.google.com/search?q=%s&um=1&ie=UTF-8&hl=en&tbm=isch"),
    (
        "gdef",
        "http://www.google.com/search?q=define%%3A+%s&hl=en&lr=&oi=definel&defl=all",
    ),
    ("imdb", "http://www.imdb.com/find?q=%s"),
    ("gm", "http://maps.google.com/maps?q=%s"),
];
