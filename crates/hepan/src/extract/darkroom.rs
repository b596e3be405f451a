//! Darkroom adapter (`forum.php?mod=misc&action=showdarkroom`).

use serde::Serialize;

use crate::error::ParseError;
use crate::types::UserId;

use super::{Extract, attr, document, find, find_all, number, text};

const ROW_ID_PREFIX: &str = "darkroomuid_";

/// A sanctioned user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DarkroomEntry {
    pub name: String,
    pub uid: UserId,
    /// Sanction applied (banned from posting, from visiting, ...).
    pub action: String,
    /// When the sanction lifts, as displayed.
    pub expiration: String,
    /// When the sanction was applied, as displayed.
    pub time: String,
    pub reason: String,
}

/// The darkroom listing. Only the first page the forum renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Darkroom(pub Vec<DarkroomEntry>);

impl Extract for Darkroom {
    fn extract(raw: &str) -> Result<Self, ParseError> {
        let html = document(raw);
        let table = find(html.root_element(), "table#darkroomtable")?;

        let entries = find_all(table, r#"tr[id^="darkroomuid_"]"#)?
            .into_iter()
            .map(|row| {
                let row_id = attr(row, "id")?;
                let uid = row_id
                    .strip_prefix(ROW_ID_PREFIX)
                    .ok_or_else(|| ParseError::invalid("darkroom row id", row_id))?;

                let cells = find_all(row, "td")?;
                if cells.len() < 5 {
                    return Err(ParseError::missing(format!("darkroom row {row_id} cells")));
                }

                Ok(DarkroomEntry {
                    name: text(cells[0]),
                    uid: UserId(number("darkroom uid", uid)?),
                    action: text(cells[1]),
                    expiration: text(cells[2]),
                    time: text(cells[3]),
                    reason: text(cells[4]),
                })
            })
            .collect::<Result<Vec<_>, ParseError>>()?;

        Ok(Darkroom(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body>
<table id="darkroomtable">
  <tr><th>用户名</th><th>操作行为</th><th>过期时间</th><th>操作时间</th><th>理由</th></tr>
  <tr id="darkroomuid_31337">
    <td><a href="home.php?mod=space&amp;uid=31337">spammer</a></td>
    <td>禁止发言</td>
    <td>2026-11-01 00:00</td>
    <td>2026-10-01 12:30</td>
    <td>广告</td>
  </tr>
  <tr id="darkroomuid_42">
    <td>troll</td><td>禁止访问</td><td>永久</td><td>2026-09-30 08:00</td><td>人身攻击</td>
  </tr>
</table>
</body></html>"#;

    #[test]
    fn parses_rows_with_uid_from_id() {
        let Darkroom(entries) = Darkroom::extract(PAGE).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "spammer");
        assert_eq!(entries[0].uid, UserId(31337));
        assert_eq!(entries[0].action, "禁止发言");
        assert_eq!(entries[1].expiration, "永久");
        assert_eq!(entries[1].reason, "人身攻击");
    }

    #[test]
    fn empty_table_is_empty_list() {
        let page = r#"<table id="darkroomtable"><tr><th>用户名</th></tr></table>"#;
        assert!(Darkroom::extract(page).unwrap().0.is_empty());
    }

    #[test]
    fn missing_table_fails() {
        assert!(Darkroom::extract("<html></html>").is_err());
    }

    #[test]
    fn short_row_fails() {
        let page = r#"<table id="darkroomtable"><tr id="darkroomuid_1"><td>a</td></tr></table>"#;
        assert!(Darkroom::extract(page).is_err());
    }
}
