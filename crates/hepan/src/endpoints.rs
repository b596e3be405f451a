//! Endpoint definitions and request/response types of the forum surface.
//!
//! Legacy endpoints are Discuz `*.php` scripts selected by `mod=` and
//! `action=`/`do=` query parameters; the JSON family lives under
//! `/star/api/v1`.

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

// ============================================================================
// Paths
// ============================================================================

/// Forum home page; carries the formhash and the portal blocks.
pub const HOME: &str = "";

/// Legacy login form target. Answers with an XML/HTML fragment.
pub const LOGIN: &str =
    "member.php?mod=logging&action=login&loginsubmit=yes&loginhash=Lcefp&inajax=1";

/// Exchanges the legacy cookie session for a JSON API authorization.
pub const ADOPT_LEGACY_AUTH: &str = "star/api/v1/auth/adoptLegacyAuth";

/// Marker header the token exchange requires.
pub const STAR_MARKER_HEADER: &str = "X-Uestc-Bbs";

/// Paginated post list of a thread (JSON).
pub const POST_LIST: &str = "star/api/v1/post/list";

/// Rating form target.
pub const RATE: &str = "forum.php?mod=misc&action=rate&ratesubmit=yes&inajax=1";

/// Darkroom (moderation penalty box) listing.
pub const DARKROOM: &str = "forum.php?mod=misc&action=showdarkroom";

/// Ranking boards.
pub const RANKLIST: &str = "misc.php";

/// Task centre.
pub const TASK: &str = "home.php";

/// Comment form target for one post.
pub fn comment(tid: u64, pid: u64) -> String {
    format!(
        "forum.php?mod=post&action=reply&comment=yes&tid={}&pid={}&commentsubmit=yes",
        tid, pid
    )
}

// ============================================================================
// Forms
// ============================================================================

/// Body of the legacy login form.
#[derive(Serialize)]
pub struct LoginForm<'a> {
    pub loginfield: &'static str,
    pub username: &'a str,
    pub password: &'a str,
}

/// Body of the rating form.
#[derive(Debug, Serialize)]
pub struct RateForm<'a> {
    pub formhash: &'a str,
    pub tid: u64,
    pub pid: u64,
    pub score2: i32,
    pub reason: &'a str,
}

/// Body of the comment form.
#[derive(Debug, Serialize)]
pub struct CommentForm<'a> {
    pub formhash: &'a str,
    pub handlekey: &'static str,
    pub message: &'a str,
}

// ============================================================================
// Queries
// ============================================================================

/// Query for the post list endpoint.
#[derive(Debug, Serialize)]
pub struct PostListQuery {
    pub thread_id: u64,
    pub page: u32,
    pub thread_details: u8,
}

/// Query for `misc.php?mod=ranklist`.
#[derive(Debug, Serialize)]
pub struct RankListQuery<'a> {
    #[serde(rename = "mod")]
    pub module: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub view: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orderby: Option<&'a str>,
}

impl<'a> RankListQuery<'a> {
    pub fn new(kind: &'static str, view: &'a str, orderby: Option<&'a str>) -> Self {
        Self {
            module: "ranklist",
            kind,
            view,
            orderby,
        }
    }
}

/// Query for the task list.
#[derive(Debug, Serialize)]
pub struct TaskListQuery<'a> {
    #[serde(rename = "mod")]
    pub module: &'static str,
    pub item: &'a str,
}

/// Query for a single task action (`view`, `apply`, `draw`).
#[derive(Debug, Serialize)]
pub struct TaskActionQuery {
    #[serde(rename = "mod")]
    pub module: &'static str,
    #[serde(rename = "do")]
    pub action: &'static str,
    pub id: u64,
}

impl TaskActionQuery {
    pub fn new(action: &'static str, id: u64) -> Self {
        Self {
            module: "task",
            action,
            id,
        }
    }
}

// ============================================================================
// Responses
// ============================================================================

/// Common envelope of the JSON API family.
///
/// `code != 0` is the uniform failure signal; `data` is endpoint specific.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<Box<RawValue>>,
}

/// Response of the token exchange.
#[derive(Debug, Deserialize)]
pub struct AdoptLegacyAuthResponse {
    #[serde(default)]
    pub data: Option<AdoptLegacyAuthData>,
}

#[derive(Debug, Deserialize)]
pub struct AdoptLegacyAuthData {
    #[serde(default)]
    pub authorization: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_query_serializes_reserved_names() {
        let query = RankListQuery::new("member", "credit", Some("all"));
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json["mod"], "ranklist");
        assert_eq!(json["type"], "member");
        assert_eq!(json["orderby"], "all");
    }

    #[test]
    fn rank_query_omits_missing_order() {
        let query = RankListQuery::new("forum", "threads", None);
        let json = serde_json::to_value(&query).unwrap();
        assert!(json.get("orderby").is_none());
    }

    #[test]
    fn comment_path_carries_ids() {
        assert!(comment(12, 34).contains("tid=12&pid=34"));
    }
}
