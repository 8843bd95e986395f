use crate::types::{
    short_name, Comparison, DailyRow, DailyStats, Dashboard, DataSource, DayComparisonRow,
    DayOverDay, District, DistrictDayComparison, DistrictSummary, SummaryRow, Totals, TrendPoint,
    TrendRow, YearOverYear,
};
use crate::util::{format_int, percent_change, rounded_average};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Totals over a run of daily records. Every counter is summed except staff,
/// which is a daily headcount and therefore averaged over the days reported.
pub fn stats_totals(stats: &[DailyStats]) -> Totals {
    let mut t = Totals::default();
    let mut staff_sum = 0u64;
    for s in stats {
        staff_sum += u64::from(s.staff_count);
        t.service += u64::from(s.service_users);
        t.restroom += u64::from(s.restroom_users);
        t.assistance += u64::from(s.assistance_count);
        t.accident += u64::from(s.accident_count);
        t.fatality += u64::from(s.fatality_count);
        t.accident_prev_year += u64::from(s.accident_count_prev_year);
        t.fatality_prev_year += u64::from(s.fatality_count_prev_year);
    }
    t.staff = rounded_average(staff_sum, stats.len());
    t
}

pub fn district_totals(district: &District) -> Totals {
    stats_totals(&district.stats)
}

pub fn summarize(districts: &[District]) -> Vec<DistrictSummary> {
    districts
        .iter()
        .map(|d| DistrictSummary {
            id: d.id.clone(),
            name: d.name.clone(),
            totals: district_totals(d),
        })
        .collect()
}

/// Elementwise sum of the per-district totals (staff included, so the grand
/// staff figure is the sum of the district daily averages).
pub fn grand_totals(summaries: &[DistrictSummary]) -> Totals {
    summaries.iter().fold(Totals::default(), |acc, s| {
        let t = &s.totals;
        Totals {
            staff: acc.staff + t.staff,
            service: acc.service + t.service,
            restroom: acc.restroom + t.restroom,
            assistance: acc.assistance + t.assistance,
            accident: acc.accident + t.accident,
            fatality: acc.fatality + t.fatality,
            accident_prev_year: acc.accident_prev_year + t.accident_prev_year,
            fatality_prev_year: acc.fatality_prev_year + t.fatality_prev_year,
        }
    })
}

/// Cross-district totals per date, oldest first. A date counts the districts
/// that reported it; the rest simply contribute nothing.
pub fn daily_trend(districts: &[District]) -> Vec<TrendPoint> {
    let mut by_date: BTreeMap<NaiveDate, TrendPoint> = BTreeMap::new();
    for s in districts.iter().flat_map(|d| &d.stats) {
        let point = by_date
            .entry(s.date)
            .or_insert(TrendPoint { date: s.date, service: 0, accident: 0, fatality: 0 });
        point.service += u64::from(s.service_users);
        point.accident += u64::from(s.accident_count);
        point.fatality += u64::from(s.fatality_count);
    }
    by_date.into_values().collect()
}

/// The "today" and "yesterday" of the report: the latest two dates present in
/// the trend. With `as_of`, dates after it are ignored.
pub fn reporting_days(
    trend: &[TrendPoint],
    as_of: Option<NaiveDate>,
) -> (Option<NaiveDate>, Option<NaiveDate>) {
    let mut dates = trend
        .iter()
        .map(|p| p.date)
        .filter(|d| as_of.map_or(true, |limit| *d <= limit))
        .rev();
    let today = dates.next();
    let yesterday = dates.next();
    (today, yesterday)
}

fn compare(current: u64, previous: u64) -> Comparison {
    Comparison { current, previous, change_pct: percent_change(current, previous) }
}

/// This holiday season against the same window last year.
pub fn year_over_year(grand: &Totals) -> YearOverYear {
    YearOverYear {
        accident: compare(grand.accident, grand.accident_prev_year),
        fatality: compare(grand.fatality, grand.fatality_prev_year),
    }
}

/// Cross-district accidents and fatalities on "today" against "yesterday".
/// A missing day counts as zero.
pub fn day_over_day(trend: &[TrendPoint], as_of: Option<NaiveDate>) -> DayOverDay {
    let (today, yesterday) = reporting_days(trend, as_of);
    let point = |date: Option<NaiveDate>| date.and_then(|d| trend.iter().find(|p| p.date == d));
    let (t, y) = (point(today), point(yesterday));
    let accident = |p: Option<&TrendPoint>| p.map_or(0, |p| p.accident);
    let fatality = |p: Option<&TrendPoint>| p.map_or(0, |p| p.fatality);
    DayOverDay {
        today,
        yesterday,
        accident: compare(accident(t), accident(y)),
        fatality: compare(fatality(t), fatality(y)),
    }
}

/// Per-district accidents and fatalities on the two reporting days.
pub fn district_day_comparisons<'a>(
    districts: &'a [District],
    today: Option<NaiveDate>,
    yesterday: Option<NaiveDate>,
) -> Vec<DistrictDayComparison> {
    let on = |d: &'a District, date: Option<NaiveDate>| date.and_then(|date| d.stats_on(date));
    districts
        .iter()
        .map(|d| {
            let (t, y) = (on(d, today), on(d, yesterday));
            DistrictDayComparison {
                id: d.id.clone(),
                name: d.name.clone(),
                accident_today: t.map_or(0, |s| s.accident_count),
                accident_yesterday: y.map_or(0, |s| s.accident_count),
                fatality_today: t.map_or(0, |s| s.fatality_count),
                fatality_yesterday: y.map_or(0, |s| s.fatality_count),
            }
        })
        .collect()
}

/// Everything the dashboard shows, computed once from one district collection.
pub fn build_dashboard(
    districts: &[District],
    source: DataSource,
    as_of: Option<NaiveDate>,
) -> Dashboard<'_> {
    let summaries = summarize(districts);
    let grand_total = grand_totals(&summaries);
    let trend = daily_trend(districts);
    let day_over_day = day_over_day(&trend, as_of);
    let district_days =
        district_day_comparisons(districts, day_over_day.today, day_over_day.yesterday);
    Dashboard {
        source,
        is_mock: source.is_mock(),
        districts,
        summaries,
        year_over_year: year_over_year(&grand_total),
        grand_total,
        trend,
        day_over_day,
        district_days,
    }
}

fn summary_row(label: &str, t: &Totals) -> SummaryRow {
    SummaryRow {
        district: label.to_string(),
        staff: format_int(t.staff),
        service: format_int(t.service),
        restroom: format_int(t.restroom),
        assistance: format_int(t.assistance),
        accident: format_int(t.accident),
        fatality: format_int(t.fatality),
    }
}

/// District summary table with a trailing grand-total row.
pub fn summary_rows(summaries: &[DistrictSummary], grand: &Totals) -> Vec<SummaryRow> {
    let mut rows: Vec<SummaryRow> =
        summaries.iter().map(|s| summary_row(&s.name, &s.totals)).collect();
    rows.push(summary_row("Total", grand));
    rows
}

/// Daily table for one district with a trailing totals row (staff averaged).
pub fn daily_rows(district: &District) -> Vec<DailyRow> {
    let mut rows: Vec<DailyRow> = district
        .stats
        .iter()
        .map(|s| DailyRow {
            date: s.date.format("%Y-%m-%d").to_string(),
            staff: format_int(s.staff_count),
            service: format_int(s.service_users),
            restroom: format_int(s.restroom_users),
            assistance: format_int(s.assistance_count),
            accident: format_int(s.accident_count),
            fatality: format_int(s.fatality_count),
        })
        .collect();
    let t = district_totals(district);
    rows.push(DailyRow {
        date: "Total".to_string(),
        staff: format_int(t.staff),
        service: format_int(t.service),
        restroom: format_int(t.restroom),
        assistance: format_int(t.assistance),
        accident: format_int(t.accident),
        fatality: format_int(t.fatality),
    });
    rows
}

pub fn trend_rows(trend: &[TrendPoint]) -> Vec<TrendRow> {
    trend
        .iter()
        .map(|p| TrendRow {
            date: p.date.format("%Y-%m-%d").to_string(),
            service: format_int(p.service),
            accident: format_int(p.accident),
            fatality: format_int(p.fatality),
        })
        .collect()
}

pub fn day_comparison_rows(days: &[DistrictDayComparison]) -> Vec<DayComparisonRow> {
    days.iter()
        .map(|d| DayComparisonRow {
            district: short_name(&d.name),
            accident_yesterday: d.accident_yesterday,
            accident_today: d.accident_today,
            fatality_yesterday: d.fatality_yesterday,
            fatality_today: d.fatality_today,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock;
    use crate::types::DISTRICTS;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, d).unwrap()
    }

    fn stat(d: u32, accidents: u32) -> DailyStats {
        DailyStats { accident_count: accidents, ..DailyStats::empty(day(d)) }
    }

    fn district(index: usize, stats: Vec<DailyStats>) -> District {
        District { stats, ..District::from_entry(index, &DISTRICTS[index]) }
    }

    fn two_districts() -> Vec<District> {
        vec![district(0, vec![stat(1, 2), stat(2, 3)]), district(1, vec![stat(1, 1), stat(2, 0)])]
    }

    #[test]
    fn trend_sums_across_districts() {
        let trend = daily_trend(&two_districts());
        let got: Vec<(NaiveDate, u64)> = trend.iter().map(|p| (p.date, p.accident)).collect();
        assert_eq!(got, vec![(day(1), 3), (day(2), 3)]);

        let dod = day_over_day(&trend, None);
        assert_eq!(dod.today, Some(day(2)));
        assert_eq!(dod.yesterday, Some(day(1)));
        assert_eq!(dod.accident.change_pct, 0.0);
    }

    #[test]
    fn trend_covers_dates_only_some_districts_report() {
        let districts = vec![
            district(0, vec![stat(3, 1)]),
            district(1, vec![stat(1, 4), stat(3, 2)]),
        ];
        let trend = daily_trend(&districts);
        assert_eq!(trend.iter().map(|p| p.date).collect::<Vec<_>>(), vec![day(1), day(3)]);
        assert_eq!(trend[1].accident, 3);
    }

    #[test]
    fn staff_is_averaged_not_summed() {
        let stats = vec![
            DailyStats { staff_count: 100, service_users: 10, ..DailyStats::empty(day(1)) },
            DailyStats { staff_count: 101, service_users: 20, ..DailyStats::empty(day(2)) },
        ];
        let t = stats_totals(&stats);
        assert_eq!(t.staff, 101);
        assert_eq!(t.service, 30);
    }

    #[test]
    fn empty_district_totals_are_zero() {
        let t = district_totals(&district(2, Vec::new()));
        assert_eq!(t, Totals::default());
    }

    #[test]
    fn grand_total_is_sum_of_district_totals() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut districts = mock::generate_districts(&mut rng, mock::start_date(), 5);
        districts[3].stats.clear();
        let summaries = summarize(&districts);
        let grand = grand_totals(&summaries);

        let sum = |f: fn(&Totals) -> u64| summaries.iter().map(|s| f(&s.totals)).sum::<u64>();
        assert_eq!(grand.staff, sum(|t| t.staff));
        assert_eq!(grand.service, sum(|t| t.service));
        assert_eq!(grand.restroom, sum(|t| t.restroom));
        assert_eq!(grand.assistance, sum(|t| t.assistance));
        assert_eq!(grand.accident, sum(|t| t.accident));
        assert_eq!(grand.fatality, sum(|t| t.fatality));

        let mut reversed = summaries.clone();
        reversed.reverse();
        assert_eq!(grand_totals(&reversed), grand);
    }

    #[test]
    fn year_over_year_uses_prior_year_counters() {
        let grand = Totals {
            accident: 15,
            accident_prev_year: 10,
            fatality: 2,
            fatality_prev_year: 0,
            ..Totals::default()
        };
        let yoy = year_over_year(&grand);
        assert_eq!(yoy.accident.change_pct, 50.0);
        assert_eq!(yoy.fatality.change_pct, 0.0);
        assert_eq!(yoy.fatality.current, 2);
    }

    #[test]
    fn single_day_has_no_yesterday() {
        let trend = daily_trend(&[district(0, vec![stat(4, 2)])]);
        let dod = day_over_day(&trend, None);
        assert_eq!(dod.today, Some(day(4)));
        assert_eq!(dod.yesterday, None);
        assert_eq!(dod.accident.previous, 0);
        assert_eq!(dod.accident.change_pct, 0.0);

        let empty = day_over_day(&[], None);
        assert_eq!(empty.today, None);
        assert_eq!(empty.accident.current, 0);
    }

    #[test]
    fn as_of_pins_today() {
        let districts = vec![district(0, vec![stat(1, 2), stat(2, 4), stat(3, 1)])];
        let trend = daily_trend(&districts);
        assert_eq!(reporting_days(&trend, None), (Some(day(3)), Some(day(2))));
        assert_eq!(reporting_days(&trend, Some(day(2))), (Some(day(2)), Some(day(1))));
        let dod = day_over_day(&trend, Some(day(2)));
        assert_eq!(dod.accident.change_pct, 100.0);
        assert_eq!(reporting_days(&trend, NaiveDate::from_ymd_opt(2025, 12, 1)), (None, None));
    }

    #[test]
    fn district_comparison_counts_missing_days_as_zero() {
        let districts = vec![
            district(0, vec![stat(1, 2), stat(2, 3)]),
            district(1, vec![stat(2, 5)]),
        ];
        let rows = district_day_comparisons(&districts, Some(day(2)), Some(day(1)));
        assert_eq!((rows[0].accident_yesterday, rows[0].accident_today), (2, 3));
        assert_eq!((rows[1].accident_yesterday, rows[1].accident_today), (0, 5));

        let table = day_comparison_rows(&rows);
        assert_eq!(table[0].district, "สทล.3");
        assert_eq!(table[1].district, "สกลนครที่ 1");
    }

    #[test]
    fn dashboard_carries_source_flag() {
        let districts = two_districts();
        let dash = build_dashboard(&districts, DataSource::Mock, None);
        assert!(dash.is_mock);
        assert_eq!(dash.summaries.len(), 2);
        assert_eq!(dash.grand_total.accident, 6);
        assert_eq!(dash.trend.len(), 2);
        assert_eq!(dash.district_days.len(), 2);
    }

    #[test]
    fn tables_end_with_total_rows() {
        let districts = two_districts();
        let summaries = summarize(&districts);
        let rows = summary_rows(&summaries, &grand_totals(&summaries));
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].district, "Total");
        assert_eq!(rows[2].accident, "6");

        let daily = daily_rows(&districts[0]);
        assert_eq!(daily.len(), 3);
        assert_eq!(daily[0].date, "2026-01-01");
        assert_eq!(daily[2].date, "Total");
        assert_eq!(daily[2].accident, "5");

        assert_eq!(daily_rows(&district(4, Vec::new())).len(), 1);
    }
}
