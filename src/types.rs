use chrono::NaiveDate;
use serde::Serialize;
use tabled::Tabled;

/// One district row of the static district table: the display name and the
/// spreadsheet tab that holds its daily figures.
#[derive(Debug, Clone, Copy)]
pub struct DistrictEntry {
    pub name: &'static str,
    pub sheet: Option<&'static str>,
}

// Order matters: a district's id is derived from its position here.
pub const DISTRICTS: [DistrictEntry; 7] = [
    DistrictEntry { name: "สำนักงานทางหลวงที่ 3", sheet: Some("สทล.3") },
    DistrictEntry { name: "แขวงทางหลวงสกลนครที่ 1", sheet: Some("ขท.สกล1") },
    DistrictEntry { name: "แขวงทางหลวงสกลนครที่ 2", sheet: Some("ขท.สกล2") },
    DistrictEntry { name: "แขวงทางหลวงนครพนม", sheet: Some("ขท.นครพนม") },
    DistrictEntry { name: "แขวงทางหลวงหนองคาย", sheet: Some("ขท.หนองคาย") },
    DistrictEntry { name: "แขวงทางหลวงบึงกาฬ", sheet: Some("ขท.บึงกาฬ") },
    DistrictEntry { name: "แขวงทางหลวงมุกดาหาร", sheet: Some("ขท.มุกดาหาร") },
];

/// Stable id for the district at `index` of the district table.
pub fn district_id(index: usize) -> String {
    format!("district-{}", index + 1)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
    pub date: NaiveDate,
    pub staff_count: u32,
    pub service_users: u32,
    pub restroom_users: u32,
    pub assistance_count: u32,
    pub accident_count: u32,
    pub fatality_count: u32,
    pub accident_count_prev_year: u32,
    pub fatality_count_prev_year: u32,
}

impl DailyStats {
    /// A record for `date` with every counter at zero.
    #[cfg(test)]
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            staff_count: 0,
            service_users: 0,
            restroom_users: 0,
            assistance_count: 0,
            accident_count: 0,
            fatality_count: 0,
            accident_count_prev_year: 0,
            fatality_count_prev_year: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct District {
    pub id: String,
    pub name: String,
    pub stats: Vec<DailyStats>,
}

impl District {
    /// Build the district at `index` of the district table with no stats yet.
    pub fn from_entry(index: usize, entry: &DistrictEntry) -> Self {
        Self { id: district_id(index), name: entry.name.to_string(), stats: Vec::new() }
    }

    pub fn stats_on(&self, date: NaiveDate) -> Option<&DailyStats> {
        self.stats.iter().find(|s| s.date == date)
    }
}

/// Compact chart label: drops the "highway district" prefix and abbreviates
/// the regional office.
pub fn short_name(name: &str) -> String {
    name.replace("แขวงทางหลวง", "").replace("สำนักงานทางหลวงที่ 3", "สทล.3")
}

pub fn find_district<'a>(districts: &'a [District], id: &str) -> Option<&'a District> {
    districts.iter().find(|d| d.id == id)
}

/// Where a district collection came from. Only surfaced as a status label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Live,
    Mock,
}

impl DataSource {
    pub fn is_mock(self) -> bool {
        self == DataSource::Mock
    }

    pub fn label(self) -> &'static str {
        match self {
            DataSource::Live => "Live data (Google Sheets)",
            DataSource::Mock => "Mock data",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub staff: u64,
    pub service: u64,
    pub restroom: u64,
    pub assistance: u64,
    pub accident: u64,
    pub fatality: u64,
    pub accident_prev_year: u64,
    pub fatality_prev_year: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictSummary {
    pub id: String,
    pub name: String,
    pub totals: Totals,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub service: u64,
    pub accident: u64,
    pub fatality: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub current: u64,
    pub previous: u64,
    pub change_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearOverYear {
    pub accident: Comparison,
    pub fatality: Comparison,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DayOverDay {
    pub today: Option<NaiveDate>,
    pub yesterday: Option<NaiveDate>,
    pub accident: Comparison,
    pub fatality: Comparison,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictDayComparison {
    pub id: String,
    pub name: String,
    pub accident_today: u32,
    pub accident_yesterday: u32,
    pub fatality_today: u32,
    pub fatality_yesterday: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard<'a> {
    pub source: DataSource,
    pub is_mock: bool,
    pub districts: &'a [District],
    pub summaries: Vec<DistrictSummary>,
    pub grand_total: Totals,
    pub trend: Vec<TrendPoint>,
    pub year_over_year: YearOverYear,
    pub day_over_day: DayOverDay,
    pub district_days: Vec<DistrictDayComparison>,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct SummaryRow {
    #[serde(rename = "District")]
    #[tabled(rename = "District")]
    pub district: String,
    #[serde(rename = "StaffAvgPerDay")]
    #[tabled(rename = "StaffAvgPerDay")]
    pub staff: String,
    #[serde(rename = "ServiceUsers")]
    #[tabled(rename = "ServiceUsers")]
    pub service: String,
    #[serde(rename = "Restroom")]
    #[tabled(rename = "Restroom")]
    pub restroom: String,
    #[serde(rename = "Assistance")]
    #[tabled(rename = "Assistance")]
    pub assistance: String,
    #[serde(rename = "Accidents")]
    #[tabled(rename = "Accidents")]
    pub accident: String,
    #[serde(rename = "Fatalities")]
    #[tabled(rename = "Fatalities")]
    pub fatality: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct DailyRow {
    #[serde(rename = "Date")]
    #[tabled(rename = "Date")]
    pub date: String,
    #[serde(rename = "Staff")]
    #[tabled(rename = "Staff")]
    pub staff: String,
    #[serde(rename = "ServiceUsers")]
    #[tabled(rename = "ServiceUsers")]
    pub service: String,
    #[serde(rename = "Restroom")]
    #[tabled(rename = "Restroom")]
    pub restroom: String,
    #[serde(rename = "Assistance")]
    #[tabled(rename = "Assistance")]
    pub assistance: String,
    #[serde(rename = "Accidents")]
    #[tabled(rename = "Accidents")]
    pub accident: String,
    #[serde(rename = "Fatalities")]
    #[tabled(rename = "Fatalities")]
    pub fatality: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct TrendRow {
    #[serde(rename = "Date")]
    #[tabled(rename = "Date")]
    pub date: String,
    #[serde(rename = "ServiceUsers")]
    #[tabled(rename = "ServiceUsers")]
    pub service: String,
    #[serde(rename = "Accidents")]
    #[tabled(rename = "Accidents")]
    pub accident: String,
    #[serde(rename = "Fatalities")]
    #[tabled(rename = "Fatalities")]
    pub fatality: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct DayComparisonRow {
    #[serde(rename = "District")]
    #[tabled(rename = "District")]
    pub district: String,
    #[serde(rename = "AccidentsYesterday")]
    #[tabled(rename = "AccidentsYesterday")]
    pub accident_yesterday: u32,
    #[serde(rename = "AccidentsToday")]
    #[tabled(rename = "AccidentsToday")]
    pub accident_today: u32,
    #[serde(rename = "FatalitiesYesterday")]
    #[tabled(rename = "FatalitiesYesterday")]
    pub fatality_yesterday: u32,
    #[serde(rename = "FatalitiesToday")]
    #[tabled(rename = "FatalitiesToday")]
    pub fatality_today: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_follow_table_order() {
        assert_eq!(district_id(0), "district-1");
        assert_eq!(district_id(6), "district-7");
        let d = District::from_entry(3, &DISTRICTS[3]);
        assert_eq!(d.id, "district-4");
        assert_eq!(d.name, "แขวงทางหลวงนครพนม");
        assert!(d.stats.is_empty());
    }

    #[test]
    fn short_names_for_charts() {
        assert_eq!(short_name(DISTRICTS[0].name), "สทล.3");
        assert_eq!(short_name(DISTRICTS[3].name), "นครพนม");
        assert_eq!(short_name("Elsewhere"), "Elsewhere");
    }

    #[test]
    fn find_district_by_id() {
        let districts: Vec<District> = DISTRICTS
            .iter()
            .enumerate()
            .map(|(i, e)| District::from_entry(i, e))
            .collect();
        let found = find_district(&districts, "district-2").map(|d| d.name.as_str());
        assert_eq!(found, Some(DISTRICTS[1].name));
        assert!(find_district(&districts, "district-8").is_none());
    }

    #[test]
    fn daily_stats_serializes_camel_case() {
        let s = DailyStats::empty(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["date"], "2026-01-01");
        assert_eq!(json["accidentCountPrevYear"], 0);
        assert_eq!(json["staffCount"], 0);
    }
}
