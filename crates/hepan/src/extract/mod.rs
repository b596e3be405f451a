//! Extraction adapters.
//!
//! Each data shape the forum serves (a reply page, a ranking table, the
//! task centre, ...) has one adapter: a type implementing [`Extract`],
//! which turns one raw response body into a typed record. All selector and
//! field-name knowledge of the upstream layout lives here; the session and
//! the paginated fetcher only move bytes.
//!
//! Adapters never fill in defaults. A missing element or an unreadable
//! value fails the whole page with a [`ParseError`], since the upstream
//! layout is unversioned and a silent default would hide a layout change.

mod darkroom;
mod home;
mod posts;
mod ranking;
mod tasks;

use scraper::{ElementRef, Html, Selector};

use crate::error::ParseError;

pub use darkroom::{Darkroom, DarkroomEntry};
pub use home::{TopPost, TopPosts};
pub use posts::{PostList, PostRow, Reply, ThreadInfo};
pub use ranking::{ForumRankEntry, PollRankEntry, Ranking, ThreadRankEntry, UserRankEntry};
pub use tasks::{TaskDetail, TaskList, TaskMessage, TaskStatus, TaskSummary};

/// Parse one raw response into a typed record.
pub trait Extract: Sized {
    /// `raw` is an HTML document for legacy pages, or the `data` member of
    /// the JSON envelope for API endpoints.
    fn extract(raw: &str) -> Result<Self, ParseError>;
}

// ============================================================================
// Selector helpers shared by the HTML adapters
// ============================================================================

pub(crate) fn selector(css: &str) -> Result<Selector, ParseError> {
    Selector::parse(css).map_err(|e| ParseError::invalid("selector", format!("{css}: {e:?}")))
}

/// First element under `scope` matching `css`.
pub(crate) fn find<'a>(scope: ElementRef<'a>, css: &str) -> Result<ElementRef<'a>, ParseError> {
    let sel = selector(css)?;
    scope
        .select(&sel)
        .next()
        .ok_or_else(|| ParseError::missing(css))
}

/// First element under `scope` matching `css`, if any.
pub(crate) fn find_opt<'a>(
    scope: ElementRef<'a>,
    css: &str,
) -> Result<Option<ElementRef<'a>>, ParseError> {
    let sel = selector(css)?;
    Ok(scope.select(&sel).next())
}

/// All elements under `scope` matching `css`, in document order.
pub(crate) fn find_all<'a>(
    scope: ElementRef<'a>,
    css: &str,
) -> Result<Vec<ElementRef<'a>>, ParseError> {
    let sel = selector(css)?;
    Ok(scope.select(&sel).collect())
}

/// Concatenated, trimmed text content.
pub(crate) fn text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Required attribute value.
pub(crate) fn attr<'a>(element: ElementRef<'a>, name: &str) -> Result<&'a str, ParseError> {
    element
        .value()
        .attr(name)
        .ok_or_else(|| ParseError::missing(format!("{}@{}", element.value().name(), name)))
}

/// Element children only, skipping whitespace text nodes.
pub(crate) fn element_children<'a>(element: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    element.children().filter_map(ElementRef::wrap).collect()
}

/// The number after the last `=` of a link such as `home.php?mod=space&uid=42`.
pub(crate) fn trailing_id(href: &str) -> Result<u64, ParseError> {
    href.rsplit('=')
        .next()
        .and_then(|tail| tail.trim().parse().ok())
        .ok_or_else(|| ParseError::invalid("trailing id", href))
}

/// Numeric query parameter `key` of a link, e.g. `tid` in
/// `forum.php?mod=viewthread&tid=7&extra=page%3D1`.
pub(crate) fn query_id(href: &str, key: &str) -> Result<u64, ParseError> {
    let query = href.split_once('?').map_or(href, |(_, q)| q);
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .and_then(|(_, v)| v.parse().ok())
        .ok_or_else(|| ParseError::invalid(key, href))
}

/// Thread id of a thread link, in either the plain
/// `forum.php?mod=viewthread&tid=7` form or the rewritten `thread-7-1-1.html`
/// form.
pub(crate) fn thread_id(href: &str) -> Option<u64> {
    if let Ok(id) = query_id(href, "tid") {
        return Some(id);
    }
    let file = href.rsplit('/').next()?;
    file.strip_prefix("thread-")?.split('-').next()?.parse().ok()
}

/// The first run of ASCII digits in `value`, e.g. `42` in `热度: 42`.
pub(crate) fn leading_digits(what: &str, value: &str) -> Result<u64, ParseError> {
    let digits: String = value
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();
    number(what, &digits).map_err(|_| ParseError::invalid(what, value))
}

pub(crate) fn number<T: std::str::FromStr>(what: &str, value: &str) -> Result<T, ParseError> {
    value
        .trim()
        .parse()
        .map_err(|_| ParseError::invalid(what, value))
}

/// Rank cells show a medal image (with the rank as `alt`) for the top three
/// and plain text below.
pub(crate) fn rank_number(cell: ElementRef<'_>) -> Result<u32, ParseError> {
    match find_opt(cell, "img")? {
        Some(img) => number("rank", attr(img, "alt")?),
        None => number("rank", &text(cell)),
    }
}

pub(crate) fn document(raw: &str) -> Html {
    Html::parse_document(raw)
}
