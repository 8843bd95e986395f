// Picks between the spreadsheet and generated data for one request.
use crate::config::Credentials;
use crate::mock;
use crate::sheets;
use crate::types::{DataSource, District};

/// Current district data and where it came from.
///
/// Tries the spreadsheet first and falls back to mock data when it yields
/// nothing. Nothing is remembered between calls, so every call retries the
/// live source from scratch.
pub async fn select_source(credentials: Option<&Credentials>) -> (Vec<District>, DataSource) {
    choose(sheets::fetch_sheet_data(credentials).await, mock::mock_districts)
}

fn choose(
    live: Option<Vec<District>>,
    fallback: impl FnOnce() -> Vec<District>,
) -> (Vec<District>, DataSource) {
    match live {
        Some(districts) => (districts, DataSource::Live),
        None => (fallback(), DataSource::Mock),
    }
}

/// Mock data without consulting the spreadsheet at all.
pub fn mock_source() -> (Vec<District>, DataSource) {
    choose(None, mock::mock_districts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DISTRICTS;

    #[test]
    fn live_data_wins_when_present() {
        let live = vec![District::from_entry(0, &DISTRICTS[0])];
        let (districts, source) = choose(Some(live.clone()), || panic!("fallback must not run"));
        assert_eq!(source, DataSource::Live);
        assert!(!source.is_mock());
        assert_eq!(districts, live);
    }

    #[test]
    fn empty_live_collection_is_still_live() {
        let (districts, source) = choose(Some(Vec::new()), mock::mock_districts);
        assert_eq!(source, DataSource::Live);
        assert!(districts.is_empty());
    }

    #[tokio::test]
    async fn falls_back_to_mock_without_credentials() {
        let (districts, source) = select_source(None).await;
        assert!(source.is_mock());
        assert_eq!(districts.len(), DISTRICTS.len());
        assert!(districts.iter().all(|d| d.stats.len() == mock::DAYS_TO_GENERATE as usize));
    }

    #[test]
    fn mock_source_is_mock() {
        let (districts, source) = mock_source();
        assert_eq!(source, DataSource::Mock);
        assert_eq!(districts.len(), 7);
    }
}
