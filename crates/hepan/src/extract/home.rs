//! Home page adapters: the formhash field and the portal top lists.

use serde::Serialize;

use crate::auth::FormHash;
use crate::error::ParseError;
use crate::types::{ThreadId, UserId};

use super::{Extract, attr, document, find, find_all, find_opt, text, trailing_id};

impl Extract for FormHash {
    fn extract(raw: &str) -> Result<Self, ParseError> {
        let html = document(raw);
        let input = find(html.root_element(), r#"input[name="formhash"]"#)?;
        let value = attr(input, "value")?;
        if value.is_empty() {
            return Err(ParseError::invalid("formhash", value));
        }
        Ok(FormHash::new(value))
    }
}

/// One entry of a home page list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopPost {
    pub tid: ThreadId,
    pub title: String,
    /// Author, absent for blocks that do not show one.
    pub uid: Option<UserId>,
    /// Author name, empty when `uid` is absent.
    pub uname: String,
}

/// The six portal blocks of the legacy home page, ten threads each.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopPosts {
    pub new_reply: Vec<TopPost>,
    pub new_post: Vec<TopPost>,
    pub hot: Vec<TopPost>,
    pub activity: Vec<TopPost>,
    pub live: Vec<TopPost>,
    pub show: Vec<TopPost>,
}

const NEW_REPLY_BLOCK: &str = "#portal_block_66_content";
const NEW_POST_BLOCK: &str = "#portal_block_67_content";
const HOT_BLOCK: &str = "#portal_block_68_content";
const ACTIVITY_BLOCK: &str = "#portal_block_97_content";
const LIVE_BLOCK: &str = "#portal_block_96_content";
const SHOW_BLOCK: &str = "#portal_block_95_content";

impl Extract for TopPosts {
    fn extract(raw: &str) -> Result<Self, ParseError> {
        let html = document(raw);
        let root = html.root_element();

        let block = |id: &str| -> Result<Vec<TopPost>, ParseError> {
            let container = find(root, id)?;
            find_all(container, "li")?
                .into_iter()
                .map(|li| {
                    let (uid, uname) = match find_opt(li, "em a")? {
                        Some(a) => (Some(UserId(trailing_id(attr(a, "href")?)?)), text(a)),
                        None => (None, String::new()),
                    };
                    let link = find(li, "a[title]")?;
                    Ok(TopPost {
                        tid: ThreadId(trailing_id(attr(link, "href")?)?),
                        title: attr(link, "title")?.to_string(),
                        uid,
                        uname,
                    })
                })
                .collect()
        };

        Ok(TopPosts {
            new_reply: block(NEW_REPLY_BLOCK)?,
            new_post: block(NEW_POST_BLOCK)?,
            hot: block(HOT_BLOCK)?,
            activity: block(ACTIVITY_BLOCK)?,
            live: block(LIVE_BLOCK)?,
            show: block(SHOW_BLOCK)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(id: u32, items: &str) -> String {
        format!(r#"<div id="portal_block_{id}_content"><ul>{items}</ul></div>"#)
    }

    const WITH_AUTHOR: &str = r#"<li><em><a href="home.php?mod=space&amp;uid=208">range6</a></em>
        <a href="forum.php?mod=viewthread&amp;tid=2287221" title="抢楼送水">抢楼送水</a></li>"#;
    const WITHOUT_AUTHOR: &str =
        r#"<li><a href="forum.php?mod=viewthread&amp;tid=1999" title="活动预告">活动预告</a></li>"#;

    fn home_page() -> String {
        let mut body = String::from(r#"<html><body><form><input type="hidden" name="formhash" value="f00dbabe"></form>"#);
        body.push_str(&block(66, WITH_AUTHOR));
        body.push_str(&block(67, WITH_AUTHOR));
        body.push_str(&block(68, ""));
        body.push_str(&block(97, WITHOUT_AUTHOR));
        body.push_str(&block(96, WITH_AUTHOR));
        body.push_str(&block(95, WITHOUT_AUTHOR));
        body.push_str("</body></html>");
        body
    }

    #[test]
    fn formhash_from_hidden_input() {
        let hash = FormHash::extract(&home_page()).unwrap();
        assert_eq!(hash.as_str(), "f00dbabe");
    }

    #[test]
    fn formhash_missing_is_parse_error() {
        let err = FormHash::extract("<html><body>请先登录</body></html>").unwrap_err();
        assert!(matches!(err, ParseError::MissingElement { .. }));
    }

    #[test]
    fn top_posts_reads_all_blocks() {
        let top = TopPosts::extract(&home_page()).unwrap();

        assert_eq!(top.new_reply.len(), 1);
        assert_eq!(top.new_reply[0].tid, ThreadId(2287221));
        assert_eq!(top.new_reply[0].uid, Some(UserId(208)));
        assert_eq!(top.new_reply[0].uname, "range6");
        assert_eq!(top.new_reply[0].title, "抢楼送水");

        assert!(top.hot.is_empty());
        assert_eq!(top.activity[0].uid, None);
        assert_eq!(top.activity[0].uname, "");
    }

    #[test]
    fn top_posts_missing_block_fails() {
        let page = block(66, WITH_AUTHOR);
        assert!(TopPosts::extract(&page).is_err());
    }
}
