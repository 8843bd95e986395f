// Synthetic district data for when no spreadsheet is configured.
use crate::types::{DailyStats, District, DISTRICTS};
use chrono::{Days, NaiveDate};
use rand::Rng;

pub const DAYS_TO_GENERATE: u64 = 7;

/// First day of the New Year holiday reporting window (29 Dec 2025).
pub fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 12, 29).unwrap_or_default()
}

/// `days` consecutive records starting at `start`, with counters drawn from
/// the ranges a real district reports in.
pub fn generate_daily_stats<R: Rng>(rng: &mut R, start: NaiveDate, days: u64) -> Vec<DailyStats> {
    (0..days)
        .filter_map(|offset| start.checked_add_days(Days::new(offset)))
        .map(|date| DailyStats {
            date,
            staff_count: rng.gen_range(100..150),
            service_users: rng.gen_range(50..250),
            restroom_users: rng.gen_range(100..400),
            assistance_count: rng.gen_range(0..20),
            accident_count: rng.gen_range(0..5),
            fatality_count: rng.gen_range(0..2),
            accident_count_prev_year: rng.gen_range(0..5),
            fatality_count_prev_year: rng.gen_range(0..2),
        })
        .collect()
}

pub fn generate_districts<R: Rng>(rng: &mut R, start: NaiveDate, days: u64) -> Vec<District> {
    DISTRICTS
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let mut district = District::from_entry(index, entry);
            district.stats = generate_daily_stats(&mut *rng, start, days);
            district
        })
        .collect()
}

/// Fresh mock data for the standard holiday window.
pub fn mock_districts() -> Vec<District> {
    generate_districts(&mut rand::thread_rng(), start_date(), DAYS_TO_GENERATE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn seven_contiguous_days_per_district() {
        let districts = mock_districts();
        assert_eq!(districts.len(), DISTRICTS.len());
        for d in &districts {
            assert_eq!(d.stats.len(), 7);
            assert_eq!(d.stats[0].date, start_date());
            for pair in d.stats.windows(2) {
                assert_eq!(pair[1].date, pair[0].date.succ_opt().unwrap());
            }
        }
        assert_eq!(districts[6].stats[6].date, NaiveDate::from_ymd_opt(2026, 1, 4).unwrap());
    }

    #[test]
    fn values_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(2569);
        let districts = generate_districts(&mut rng, start_date(), 30);
        for s in districts.iter().flat_map(|d| &d.stats) {
            assert!((100..150).contains(&s.staff_count));
            assert!((50..250).contains(&s.service_users));
            assert!((100..400).contains(&s.restroom_users));
            assert!(s.assistance_count < 20);
            assert!(s.accident_count < 5);
            assert!(s.fatality_count < 2);
            assert!(s.accident_count_prev_year < 5);
            assert!(s.fatality_count_prev_year < 2);
        }
    }

    #[test]
    fn ids_match_table_order() {
        let mut rng = StdRng::seed_from_u64(1);
        let districts = generate_districts(&mut rng, start_date(), 0);
        let ids: Vec<&str> = districts.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids[0], "district-1");
        assert_eq!(ids[6], "district-7");
        assert!(districts.iter().all(|d| d.stats.is_empty()));
    }
}
