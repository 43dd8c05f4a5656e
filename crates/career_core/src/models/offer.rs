use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Transfer proposal from one team to the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub id: String,
    pub team_id: String,
    pub team_name: String,
    /// League display name at the time of the offer
    pub league: String,
    pub salary: f64,
    pub contract_length: u8,
    pub signing_bonus: f64,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "expiryDate")]
    pub expires_at: DateTime<Utc>,
}

impl Offer {
    /// Expired once `now` is strictly past the expiry timestamp
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Whole days left before expiry, rounded up (0 once expired)
    pub fn days_remaining(&self, now: DateTime<Utc>) -> i64 {
        let seconds = (self.expires_at - now).num_seconds();
        if seconds <= 0 {
            return 0;
        }
        (seconds + 86_399) / 86_400
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn offer_expiring_at(expires_at: DateTime<Utc>) -> Offer {
        Offer {
            id: "offer_1_1000".into(),
            team_id: "LEAGUE_2_3".into(),
            team_name: "Leeds Rovers".into(),
            league: "League 2".into(),
            salary: 1.2,
            contract_length: 2,
            signing_bonus: 0.6,
            created_at: expires_at - Duration::days(7),
            expires_at,
        }
    }

    #[test]
    fn test_expiry_is_strict() {
        let expiry = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let offer = offer_expiring_at(expiry);

        assert!(!offer.is_expired(expiry));
        assert!(offer.is_expired(expiry + Duration::seconds(1)));
        assert!(!offer.is_expired(expiry - Duration::days(3)));
    }

    #[test]
    fn test_days_remaining_rounds_up() {
        let expiry = Utc.with_ymd_and_hms(2025, 3, 8, 12, 0, 0).unwrap();
        let offer = offer_expiring_at(expiry);

        assert_eq!(offer.days_remaining(expiry - Duration::hours(1)), 1);
        assert_eq!(offer.days_remaining(expiry - Duration::days(7)), 7);
        assert_eq!(offer.days_remaining(expiry + Duration::hours(1)), 0);
    }
}
