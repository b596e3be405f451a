//! Success markers of the legacy HTML endpoints.
//!
//! The legacy forms report success through locale-specific text embedded in
//! the response body rather than status codes. Every such string lives in
//! [`MARKERS`] so an upstream wording change touches one table.

/// Legacy endpoints whose result is read from body text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Login,
    Rate,
    ApplyTask,
    FinishTask,
}

/// What a matched marker means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// Too many failed logins; the account is temporarily locked.
    LockedOut,
}

/// One row of the marker table.
#[derive(Debug, Clone, Copy)]
pub struct SuccessMarker {
    pub endpoint: Endpoint,
    pub marker: &'static str,
    pub outcome: Outcome,
}

/// All known markers. Earlier rows win when several match.
pub const MARKERS: &[SuccessMarker] = &[
    SuccessMarker {
        endpoint: Endpoint::Login,
        marker: "欢迎您回来",
        outcome: Outcome::Success,
    },
    SuccessMarker {
        endpoint: Endpoint::Login,
        marker: "密码错误次数过多",
        outcome: Outcome::LockedOut,
    },
    SuccessMarker {
        endpoint: Endpoint::Rate,
        marker: "感谢您的参与",
        outcome: Outcome::Success,
    },
    SuccessMarker {
        endpoint: Endpoint::ApplyTask,
        marker: "任务申请成功",
        outcome: Outcome::Success,
    },
    SuccessMarker {
        endpoint: Endpoint::FinishTask,
        marker: "任务已成功完成",
        outcome: Outcome::Success,
    },
];

/// Classify a response body. `None` means no marker matched, which callers
/// treat as a failure carrying the body text.
pub fn classify(endpoint: Endpoint, body: &str) -> Option<Outcome> {
    MARKERS
        .iter()
        .filter(|m| m.endpoint == endpoint)
        .find(|m| body.contains(m.marker))
        .map(|m| m.outcome)
}

/// Strip an `inajax=1` XML wrapper and markup so a failure message reads as
/// plain text.
///
/// Discuz answers AJAX forms with `<root><![CDATA[...]]></root>`.
pub fn server_message(body: &str) -> String {
    let inner = match (body.find("<![CDATA["), body.rfind("]]>")) {
        (Some(start), Some(end)) if start + 9 <= end => &body[start + 9..end],
        _ => body,
    };
    let fragment = scraper::Html::parse_fragment(inner);
    // Rate failures lead with an `errorhandle_rate(...)` script.
    let text: String = fragment
        .root_element()
        .descendants()
        .filter(|node| {
            !node.ancestors().any(|parent| {
                parent
                    .value()
                    .as_element()
                    .is_some_and(|e| matches!(e.name(), "script" | "style"))
            })
        })
        .filter_map(|node| node.value().as_text().map(|t| &**t))
        .collect();
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        body.trim().to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_success_marker() {
        let body = "<root><![CDATA[欢迎您回来，新手上路 range6]]></root>";
        assert_eq!(classify(Endpoint::Login, body), Some(Outcome::Success));
    }

    #[test]
    fn login_lockout_marker() {
        let body = "密码错误次数过多，请 15 分钟后重新登录";
        assert_eq!(classify(Endpoint::Login, body), Some(Outcome::LockedOut));
    }

    #[test]
    fn markers_do_not_leak_across_endpoints() {
        assert_eq!(classify(Endpoint::Rate, "欢迎您回来"), None);
        assert_eq!(classify(Endpoint::FinishTask, "任务申请成功"), None);
    }

    #[test]
    fn unknown_text_is_unclassified() {
        assert_eq!(classify(Endpoint::Rate, "抱歉，您不能对同一个帖子重复评分"), None);
    }

    #[test]
    fn server_message_unwraps_cdata() {
        let body = r#"<?xml version="1.0" encoding="utf-8"?>
<root><![CDATA[<script>errorhandle_rate('抱歉，您的请求来路不正确');</script>抱歉，您的请求来路不正确]]></root>"#;
        assert_eq!(server_message(body), "抱歉，您的请求来路不正确");
    }

    #[test]
    fn server_message_drops_style_and_keeps_markup_text() {
        let body = "<root><![CDATA[<style>.alert { color: red }</style>\
            <div class=\"alert_error\"><p>您已经评过分了</p></div>]]></root>";
        assert_eq!(server_message(body), "您已经评过分了");
    }

    #[test]
    fn every_endpoint_has_a_success_marker() {
        for endpoint in [
            Endpoint::Login,
            Endpoint::Rate,
            Endpoint::ApplyTask,
            Endpoint::FinishTask,
        ] {
            assert!(
                MARKERS
                    .iter()
                    .any(|m| m.endpoint == endpoint && m.outcome == Outcome::Success)
            );
        }
    }
}
