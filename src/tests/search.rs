use crate::bookmarks::Bookmark;
use crate::search::{self, SearchResult};

fn bmark(title: &str, url: &str) -> Bookmark {
    Bookmark {
        title: title.to_string(),
        url: url.to_string(),
    }
}

fn git_bookmarks() -> Vec<Bookmark> {
    vec![
        bmark("GitHub", "https://github.com"),
        bmark("Gitea Docs", "https://gitea.io/docs"),
    ]
}

/// Scores never increase down the list and equal scores are sorted by
/// case-folded title.
fn assert_ranked_case_folded(results: &[SearchResult]) {
    for pair in results.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(a.score >= 1 && b.score >= 1);
        assert!(
            a.score > b.score
                || (a.score == b.score && a.title.to_lowercase() <= b.title.to_lowercase()),
            "{a:?} should not come before {b:?}"
        );
    }
}

#[test]
pub fn test_prefix_tie_breaks_on_title() {
    let results = search::rank(&git_bookmarks(), &["git"]);

    // title prefix (2 + 1) and url hit (1) for both
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].title, "Gitea Docs");
    assert_eq!(results[1].title, "GitHub");
    assert!(results.iter().all(|r| r.score == 4));
}

#[test]
pub fn test_single_match() {
    let results = search::rank(&git_bookmarks(), &["docs"]);

    assert_eq!(
        results,
        vec![SearchResult {
            title: "Gitea Docs".to_string(),
            url: "https://gitea.io/docs".to_string(),
            score: 3,
        }]
    );
}

#[test]
pub fn test_empty_terms() {
    let terms: [&str; 0] = [];
    assert!(search::rank(&git_bookmarks(), &terms).is_empty());
    assert!(search::rank(&git_bookmarks(), &["", "  "]).is_empty());
}

#[test]
pub fn test_scores_add_up_across_terms() {
    let bmarks = vec![
        bmark("Rust Book", "https://doc.rust-lang.org/book/"),
        bmark("Crates", "https://crates.io"),
        bmark("Unrelated", "https://example.com"),
    ];

    let results = search::rank(&bmarks, &["RUST", "book"]);

    // rust: url 1 + title 3, book: url 1 + title 2
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title, "Rust Book");
    assert_eq!(results[0].score, 7);
}

#[test]
pub fn test_url_only_match() {
    let bmarks = vec![bmark("Home", "https://intranet.corp/home")];
    let results = search::rank(&bmarks, &["corp"]);
    assert_eq!(results[0].score, 1);
}

#[test]
pub fn test_order_and_determinism() {
    let bmarks = vec![
        bmark("zeta rust", "https://z.example.com"),
        bmark("Rust", "https://rust.example.com"),
        bmark("alpha rust", "https://a.example.com"),
        bmark("rust", "https://other.example.com"),
        bmark("Rustacean", "https://rustacean.net"),
        bmark("", "https://rust.empty.example.com"),
    ];

    let first = search::rank(&bmarks, &["rust"]);
    let second = search::rank(&bmarks, &["rust"]);
    assert_eq!(first, second);
    assert_ranked_case_folded(&first);

    let titles = first.iter().map(|r| r.title.as_str()).collect::<Vec<_>>();
    assert_eq!(
        titles,
        vec!["Rust", "Rustacean", "rust", "alpha rust", "zeta rust", ""]
    );
}

#[test]
pub fn test_normalize_terms() {
    assert_eq!(
        search::normalize_terms(&["Foo", "", " BAR "]),
        vec!["foo".to_string(), "bar".to_string()]
    );
}
