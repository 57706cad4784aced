use serde::{Deserialize, Serialize};

use crate::constants::records::{PLAYER_FIELD_COUNT, USER_FIELD_COUNT};
use crate::source::RawRecord;

pub use crate::types::RecordId;

/// A parsed row that carries a numeric identifier.
///
/// `parse` returns the human-readable reason on failure; the caller attaches
/// the source id and row position.
pub trait SourceRecord: Sized + Send {
    /// Identifier used by filter criteria and result ordering.
    fn record_id(&self) -> RecordId;
    /// Build a record from one raw row.
    fn parse(raw: &RawRecord) -> Result<Self, String>;
}

/// One sports-roster entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: RecordId,
    pub name: String,
    pub team: String,
    pub position: String,
    pub height_inches: i32,
    pub weight_lbs: f32,
    pub age: f32,
}

impl SourceRecord for PlayerRecord {
    fn record_id(&self) -> RecordId {
        self.id
    }

    fn parse(raw: &RawRecord) -> Result<Self, String> {
        let fields = raw.expect_fields(PLAYER_FIELD_COUNT)?;
        Ok(Self {
            id: parse_field(&fields[0], "ID")?,
            name: fields[1].clone(),
            team: fields[2].clone(),
            position: fields[3].clone(),
            height_inches: parse_field(&fields[4], "Height")?,
            weight_lbs: parse_field(&fields[5], "Weight")?,
            age: parse_field(&fields[6], "Age")?,
        })
    }
}

/// One user profile, shaped like the remote API payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: RecordId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar: String,
}

impl UserRecord {
    /// Column values in persisted order.
    pub fn to_row(&self) -> [String; USER_FIELD_COUNT] {
        [
            self.id.to_string(),
            self.email.clone(),
            self.first_name.clone(),
            self.last_name.clone(),
            self.avatar.clone(),
        ]
    }
}

impl SourceRecord for UserRecord {
    fn record_id(&self) -> RecordId {
        self.id
    }

    fn parse(raw: &RawRecord) -> Result<Self, String> {
        let fields = raw.expect_fields(USER_FIELD_COUNT)?;
        Ok(Self {
            id: parse_field(&fields[0], "ID")?,
            email: fields[1].clone(),
            first_name: fields[2].clone(),
            last_name: fields[3].clone(),
            avatar: fields[4].clone(),
        })
    }
}

fn parse_field<T: std::str::FromStr>(raw: &str, column: &str) -> Result<T, String> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| format!("error casting {column}: '{raw}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(fields: &[&str]) -> RawRecord {
        RawRecord::new(1, fields.iter().map(|f| f.to_string()).collect())
    }

    #[test]
    fn player_row_parses_all_columns() {
        let player = PlayerRecord::parse(&raw(&[
            "1",
            "Adam Donachie",
            "BAL",
            "Catcher",
            "74",
            "180",
            "22.99",
        ]))
        .unwrap();
        assert_eq!(player.id, 1);
        assert_eq!(player.name, "Adam Donachie");
        assert_eq!(player.height_inches, 74);
        assert!((player.weight_lbs - 180.0).abs() < 1e-6);
        assert!((player.age - 22.99).abs() < 1e-4);
        assert_eq!(player.record_id(), 1);
    }

    #[test]
    fn player_row_errors_name_the_column() {
        let cases = [
            (["x", "n", "t", "p", "74", "180", "22"], "ID"),
            (["1", "n", "t", "p", "tall", "180", "22"], "Height"),
            (["1", "n", "t", "p", "74", "heavy", "22"], "Weight"),
            (["1", "n", "t", "p", "74", "180", "old"], "Age"),
        ];
        for (fields, column) in cases {
            let err = PlayerRecord::parse(&raw(&fields)).unwrap_err();
            assert!(
                err.contains(&format!("error casting {column}")),
                "unexpected reason: {err}"
            );
        }
    }

    #[test]
    fn short_rows_are_rejected() {
        let err = PlayerRecord::parse(&raw(&["1", "Adam Donachie"])).unwrap_err();
        assert!(err.contains("expected 7 fields"));
        let err = UserRecord::parse(&raw(&["1"])).unwrap_err();
        assert!(err.contains("expected 5 fields"));
    }

    #[test]
    fn player_json_uses_unit_suffixed_names() {
        let player = PlayerRecord {
            id: 2,
            name: "Paul Bako".into(),
            team: "BAL".into(),
            position: "Catcher".into(),
            height_inches: 74,
            weight_lbs: 215.0,
            age: 34.69,
        };
        let value = serde_json::to_value(&player).unwrap();
        assert_eq!(value["height_inches"], 74);
        assert_eq!(value["weight_lbs"], 215.0);
        assert_eq!(value["team"], "BAL");
    }

    #[test]
    fn user_row_round_trips_through_persisted_columns() {
        let user = UserRecord {
            id: 7,
            email: "michael.lawson@reqres.in".into(),
            first_name: "Michael".into(),
            last_name: "Lawson".into(),
            avatar: "https://reqres.in/img/faces/7-image.jpg".into(),
        };
        let row = user.to_row();
        let fields: Vec<&str> = row.iter().map(String::as_str).collect();
        assert_eq!(UserRecord::parse(&raw(&fields)).unwrap(), user);
    }
}
