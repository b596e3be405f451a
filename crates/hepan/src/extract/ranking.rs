//! Ranking board adapters (`misc.php?mod=ranklist`).
//!
//! Ranking tables have no pagination contract. The result is whatever the
//! first page renders; whether the forum truncates long boards is unknown,
//! so a [`Ranking`] is never a complete listing.

use scraper::ElementRef;
use serde::Serialize;

use crate::error::ParseError;
use crate::types::{ThreadId, UserId};

use super::{
    Extract, attr, document, element_children, find, find_all, find_opt, leading_digits, number,
    rank_number, text, thread_id, trailing_id,
};

/// A ranking board: the notice shown above it and its rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ranking<T> {
    /// Explanatory notice (update time, criteria).
    pub notice: String,
    pub entries: Vec<T>,
}

/// A row of a member ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRankEntry {
    pub rank: u32,
    pub name: String,
    pub uid: UserId,
    /// The ranked value as displayed (e.g. `水滴 12345`).
    pub msg: String,
}

/// A row of a thread ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreadRankEntry {
    pub rank: u32,
    /// `None` when the title has no link, or a link that is not a thread URL.
    pub tid: Option<ThreadId>,
    pub title: String,
    /// Forum section name.
    pub forum: String,
    pub author: String,
    pub uid: UserId,
    /// Posting time as displayed.
    pub time: String,
    /// The ranked quantity: replies, views, favourites or heat.
    pub count: u64,
}

/// A row of a poll ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PollRankEntry {
    pub rank: u32,
    pub author: String,
    pub uid: UserId,
    pub title: String,
    pub tid: ThreadId,
    /// Heat value.
    pub count: u64,
    /// Posting time as displayed.
    pub time: String,
    pub voters: u32,
}

/// A row of a forum section ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForumRankEntry {
    pub rank: u32,
    pub forum: String,
    /// Threads, posts or today's posts, depending on the view.
    pub count: u64,
}

fn notice(root: ElementRef<'_>, css: &str) -> Result<String, ParseError> {
    Ok(text(find(root, css)?))
}

/// The last `n`-th element child (`1` is the last).
fn nth_last_child<'a>(row: ElementRef<'a>, n: usize) -> Result<ElementRef<'a>, ParseError> {
    let children = element_children(row);
    children
        .len()
        .checked_sub(n)
        .map(|i| children[i])
        .ok_or_else(|| {
            ParseError::missing(format!("{}th-last child of <{}>", n, row.value().name()))
        })
}

/// Data rows of the first table on the page, header row skipped.
fn table_rows(root: ElementRef<'_>) -> Result<Vec<ElementRef<'_>>, ParseError> {
    let table = find(root, "table")?;
    Ok(find_all(table, "tr")?.into_iter().skip(1).collect())
}

impl Extract for Ranking<UserRankEntry> {
    fn extract(raw: &str) -> Result<Self, ParseError> {
        let html = document(raw);
        let root = html.root_element();

        let entries = find_all(root, ".bbda.cl")?
            .into_iter()
            .map(|row| {
                let user = find(row, "dt a")?;
                Ok(UserRankEntry {
                    rank: rank_number(find(row, ".ranknum")?)?,
                    name: text(nth_last_child(row, 2)?),
                    uid: UserId(trailing_id(attr(user, "href")?)?),
                    msg: text(nth_last_child(row, 1)?),
                })
            })
            .collect::<Result<Vec<_>, ParseError>>()?;

        Ok(Ranking {
            notice: notice(root, ".notice")?,
            entries,
        })
    }
}

impl Extract for Ranking<ThreadRankEntry> {
    fn extract(raw: &str) -> Result<Self, ParseError> {
        let html = document(raw);
        let root = html.root_element();

        let entries = table_rows(root)?
            .into_iter()
            .map(|row| {
                let heading = find(row, "th")?;
                let tid = match find_opt(heading, "a")? {
                    Some(link) => thread_id(attr(link, "href")?).map(ThreadId),
                    None => None,
                };
                let by = find(row, "td.by")?;
                let author = find(by, "a")?;

                Ok(ThreadRankEntry {
                    rank: rank_number(find(row, "td.icn")?)?,
                    tid,
                    title: text(heading),
                    forum: text(find(row, "td.frm")?),
                    author: text(author),
                    uid: UserId(trailing_id(attr(author, "href")?)?),
                    time: text(find(by, "em")?),
                    count: number("thread rank count", &text(nth_last_child(row, 1)?))?,
                })
            })
            .collect::<Result<Vec<_>, ParseError>>()?;

        Ok(Ranking {
            notice: notice(root, "div.notice")?,
            entries,
        })
    }
}

impl Extract for Ranking<PollRankEntry> {
    fn extract(raw: &str) -> Result<Self, ParseError> {
        let html = document(raw);
        let root = html.root_element();
        let list = find(root, "ul.el.pll")?;

        let mut entries = Vec::new();
        for item in find_all(list, "li")? {
            // Layout rows without a rank cell are separators.
            let Some(rank_cell) = find_opt(item, "div.t")? else {
                continue;
            };

            let author = find(item, ".mtn a")?;
            let thread = find(item, ".h a")?;
            let extra = find(item, ".mtn.xg1")?;
            let text_nodes: Vec<String> = extra
                .children()
                .filter_map(|node| node.value().as_text().map(|t| t.trim().to_string()))
                .filter(|t| !t.is_empty())
                .collect();
            let (Some(heat), Some(time)) = (text_nodes.first(), text_nodes.last()) else {
                return Err(ParseError::missing("poll heat and time"));
            };

            let href = attr(thread, "href")?;
            let tid = thread_id(href).ok_or_else(|| ParseError::invalid("tid", href))?;

            entries.push(PollRankEntry {
                rank: rank_number(rank_cell)?,
                author: text(author),
                uid: UserId(trailing_id(attr(author, "href")?)?),
                title: text(thread),
                tid: ThreadId(tid),
                count: leading_digits("poll heat", heat)?,
                time: time.clone(),
                voters: number("poll voters", &text(find(item, ".s.y span")?))?,
            });
        }

        Ok(Ranking {
            notice: notice(root, "div.notice")?,
            entries,
        })
    }
}

impl Extract for Ranking<ForumRankEntry> {
    fn extract(raw: &str) -> Result<Self, ParseError> {
        let html = document(raw);
        let root = html.root_element();

        let entries = table_rows(root)?
            .into_iter()
            .map(|row| {
                Ok(ForumRankEntry {
                    rank: rank_number(find(row, "td.icn")?)?,
                    forum: text(find(row, "th")?),
                    count: number("forum rank count", &text(nth_last_child(row, 1)?))?,
                })
            })
            .collect::<Result<Vec<_>, ParseError>>()?;

        Ok(Ranking {
            notice: notice(root, "div.notice")?,
            entries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER_RANK: &str = r#"<html><body>
<div class="notice">以下数据每 24 小时更新一次</div>
<div class="tl">
  <div class="bbda cl">
    <div class="ranknum"><img src="static/image/common/rank_1.gif" alt="1"></div>
    <dl><dt><a href="home.php?mod=space&amp;uid=5">admin</a></dt></dl>
    <p class="xw1">admin</p>
    <p>水滴 99999</p>
  </div>
  <div class="bbda cl">
    <div class="ranknum">4</div>
    <dl><dt><a href="home.php?mod=space&amp;uid=208">range6</a></dt></dl>
    <p class="xw1">range6</p>
    <p>水滴 1234</p>
  </div>
</div>
</body></html>"#;

    const THREAD_RANK: &str = r#"<html><body>
<div class="notice">统计截止时间 2026-10-19</div>
<table>
  <tr><td>排名</td><th>标题</th><td>版块</td><td>作者</td><td>回复</td></tr>
  <tr>
    <td class="icn"><img src="rank_1.gif" alt="1"></td>
    <th><a href="forum.php?mod=viewthread&amp;tid=77&amp;extra=">水区大楼</a></th>
    <td class="frm">水手之家</td>
    <td class="by"><cite><a href="home.php?mod=space&amp;uid=9">sailor</a></cite><em>2026-10-01</em></td>
    <td>3210</td>
  </tr>
  <tr>
    <td class="icn">5</td>
    <th>无链接标题</th>
    <td class="frm">情感专区</td>
    <td class="by"><a href="home.php?mod=space&amp;uid=10">lover</a><em>2026-10-02</em></td>
    <td>88</td>
  </tr>
</table>
</body></html>"#;

    const POLL_RANK: &str = r#"<html><body>
<div class="notice">投票排行</div>
<ul class="el pll">
  <li class="sep"></li>
  <li>
    <div class="t"><img src="rank_2.gif" alt="2"></div>
    <p class="mtn"><a href="home.php?mod=space&amp;uid=31">voter</a></p>
    <h3 class="h"><a href="forum.php?mod=viewthread&amp;tid=4242">最喜欢的食堂</a></h3>
    <p class="mtn xg1">热度: 512<span class="pipe">|</span>2026-09-30 10:00</p>
    <div class="s y"><span>128</span></div>
  </li>
</ul>
</body></html>"#;

    const FORUM_RANK: &str = r#"<html><body>
<div class="notice">版块排行</div>
<table>
  <tr><td>排名</td><th>版块</th><td>发帖</td></tr>
  <tr><td class="icn">1</td><th><a href="forum.php?mod=forumdisplay&amp;fid=25">水手之家</a></th><td>100000</td></tr>
  <tr><td class="icn">2</td><th>就业创业</th><td>5000</td></tr>
</table>
</body></html>"#;

    #[test]
    fn user_ranking() {
        let ranking = Ranking::<UserRankEntry>::extract(USER_RANK).unwrap();

        assert_eq!(ranking.notice, "以下数据每 24 小时更新一次");
        assert_eq!(ranking.entries.len(), 2);
        assert_eq!(ranking.entries[0].rank, 1);
        assert_eq!(ranking.entries[0].uid, UserId(5));
        assert_eq!(ranking.entries[1].rank, 4);
        assert_eq!(ranking.entries[1].name, "range6");
        assert_eq!(ranking.entries[1].msg, "水滴 1234");
    }

    #[test]
    fn thread_ranking() {
        let ranking = Ranking::<ThreadRankEntry>::extract(THREAD_RANK).unwrap();

        assert_eq!(ranking.entries.len(), 2);
        let first = &ranking.entries[0];
        assert_eq!(first.rank, 1);
        assert_eq!(first.tid, Some(ThreadId(77)));
        assert_eq!(first.title, "水区大楼");
        assert_eq!(first.forum, "水手之家");
        assert_eq!(first.author, "sailor");
        assert_eq!(first.uid, UserId(9));
        assert_eq!(first.time, "2026-10-01");
        assert_eq!(first.count, 3210);
        assert_eq!(ranking.entries[1].tid, None);
        assert_eq!(ranking.entries[1].count, 88);
    }

    #[test]
    fn thread_ranking_reads_rewritten_links() {
        let page = r#"<html><body><div class="notice">回复排行</div><table>
<tr><td>排名</td><th>标题</th><td>版块</td><td>作者</td><td>回复</td></tr>
<tr><td class="icn">1</td><th><a href="thread-2287221-1-1.html">新生报到</a></th>
<td class="frm">新生专区</td>
<td class="by"><a href="home.php?mod=space&amp;uid=3">freshman</a><em>2026-09-01</em></td>
<td>640</td></tr>
<tr><td class="icn">2</td><th><a href="javascript:;">已隐藏</a></th>
<td class="frm">水手之家</td>
<td class="by"><a href="home.php?mod=space&amp;uid=4">ghost</a><em>2026-09-02</em></td>
<td>12</td></tr>
</table></body></html>"#;

        let ranking = Ranking::<ThreadRankEntry>::extract(page).unwrap();

        assert_eq!(ranking.entries.len(), 2);
        assert_eq!(ranking.entries[0].tid, Some(ThreadId(2287221)));
        assert_eq!(ranking.entries[1].tid, None);
        assert_eq!(ranking.entries[1].title, "已隐藏");
    }

    #[test]
    fn poll_ranking_skips_separators() {
        let ranking = Ranking::<PollRankEntry>::extract(POLL_RANK).unwrap();

        assert_eq!(ranking.entries.len(), 1);
        let entry = &ranking.entries[0];
        assert_eq!(entry.rank, 2);
        assert_eq!(entry.author, "voter");
        assert_eq!(entry.tid, ThreadId(4242));
        assert_eq!(entry.count, 512);
        assert_eq!(entry.time, "2026-09-30 10:00");
        assert_eq!(entry.voters, 128);
    }

    #[test]
    fn forum_ranking() {
        let ranking = Ranking::<ForumRankEntry>::extract(FORUM_RANK).unwrap();

        assert_eq!(ranking.notice, "版块排行");
        assert_eq!(
            ranking.entries,
            vec![
                ForumRankEntry {
                    rank: 1,
                    forum: "水手之家".to_string(),
                    count: 100000,
                },
                ForumRankEntry {
                    rank: 2,
                    forum: "就业创业".to_string(),
                    count: 5000,
                },
            ]
        );
    }

    #[test]
    fn missing_notice_fails() {
        let page = FORUM_RANK.replace(r#"<div class="notice">版块排行</div>"#, "");
        assert!(Ranking::<ForumRankEntry>::extract(&page).is_err());
    }

    #[test]
    fn non_numeric_count_fails() {
        let page = FORUM_RANK.replace("<td>5000</td>", "<td>很多</td>");
        let err = Ranking::<ForumRankEntry>::extract(&page).unwrap_err();
        assert!(matches!(err, ParseError::InvalidValue { .. }));
    }
}
