// Live source: districts read from the Google Sheets workbook, one tab per
// district.
use crate::config::Credentials;
use crate::error::SheetsError;
use crate::types::{DailyStats, District, DistrictEntry, DISTRICTS};
use crate::util::{parse_count_safe, parse_date_safe};
use async_trait::async_trait;
use chrono::NaiveDate;
use futures::future::try_join_all;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use url::Url;

const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const TOKEN_LIFETIME_SECS: i64 = 3600;

pub const COL_DATE: &str = "Date";
pub const COL_STAFF: &str = "Staff";
pub const COL_SERVICE: &str = "ServiceUsers";
pub const COL_RESTROOM: &str = "Restroom";
pub const COL_ASSISTANCE: &str = "Assistance";
pub const COL_ACCIDENTS: &str = "Accidents";
pub const COL_FATALITIES: &str = "Fatalities";
pub const COL_ACCIDENTS_PREV_YEAR: &str = "Accidents2568";
pub const COL_FATALITIES_PREV_YEAR: &str = "Fatalities2568";

/// One data row of a tab, keyed by the tab's header row.
#[derive(Debug, Clone, Default)]
pub struct SheetRow {
    cells: HashMap<String, String>,
}

impl SheetRow {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    /// Key `values` by `headers`. Cells past the end of a short row are absent.
    pub fn from_cells(headers: &[String], values: &[String]) -> Self {
        let cells = headers
            .iter()
            .zip(values)
            .filter(|(h, _)| !h.is_empty())
            .map(|(h, v)| (h.clone(), v.clone()))
            .collect();
        Self { cells }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SheetRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self { cells: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }
}

/// Read access to a tabbed spreadsheet.
#[async_trait]
pub trait SheetClient: Send + Sync {
    /// Titles of every tab in the spreadsheet.
    async fn sheet_titles(&self) -> Result<Vec<String>, SheetsError>;

    /// Data rows of the tab titled `title`, header row excluded.
    async fn rows(&self, title: &str) -> Result<Vec<SheetRow>, SheetsError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub kept_rows: usize,
    pub dropped_rows: usize,
    pub duplicate_dates: usize,
    pub missing_tabs: usize,
}

impl LoadReport {
    fn merge(&mut self, other: &LoadReport) {
        self.total_rows += other.total_rows;
        self.kept_rows += other.kept_rows;
        self.dropped_rows += other.dropped_rows;
        self.duplicate_dates += other.duplicate_dates;
        self.missing_tabs += other.missing_tabs;
    }
}

/// Map one sheet row to a record. Rows without a usable date are skipped;
/// numeric cells that are missing or unreadable count as 0.
pub fn parse_row(row: &SheetRow) -> Option<DailyStats> {
    let date = parse_date_safe(row.get(COL_DATE))?;
    let count = |column: &str| parse_count_safe(row.get(column)).unwrap_or(0);
    Some(DailyStats {
        date,
        staff_count: count(COL_STAFF),
        service_users: count(COL_SERVICE),
        restroom_users: count(COL_RESTROOM),
        assistance_count: count(COL_ASSISTANCE),
        accident_count: count(COL_ACCIDENTS),
        fatality_count: count(COL_FATALITIES),
        accident_count_prev_year: count(COL_ACCIDENTS_PREV_YEAR),
        fatality_count_prev_year: count(COL_FATALITIES_PREV_YEAR),
    })
}

/// Turn a tab's rows into date-ordered stats with one record per date.
pub fn collect_stats(sheet: &str, rows: &[SheetRow], report: &mut LoadReport) -> Vec<DailyStats> {
    let mut by_date: BTreeMap<NaiveDate, DailyStats> = BTreeMap::new();
    for row in rows {
        report.total_rows += 1;
        let Some(stats) = parse_row(row) else {
            log::debug!("[{}] dropping row without a valid date: {:?}", sheet, row.get(COL_DATE));
            report.dropped_rows += 1;
            continue;
        };
        let date = stats.date;
        // Later rows win: a re-entered date is a correction.
        if by_date.insert(date, stats).is_some() {
            log::warn!("[{}] duplicate row for {}, keeping the later one", sheet, date);
            report.duplicate_dates += 1;
        }
    }
    if !rows.is_empty() && by_date.is_empty() {
        log::warn!(
            "[{}] none of {} rows had a readable date; check the Date column format",
            sheet,
            rows.len()
        );
    }
    report.kept_rows += by_date.len();
    by_date.into_values().collect()
}

async fn load_district<C: SheetClient + ?Sized>(
    client: &C,
    titles: &HashSet<String>,
    index: usize,
    entry: &DistrictEntry,
) -> Result<(District, LoadReport), SheetsError> {
    let mut district = District::from_entry(index, entry);
    let mut report = LoadReport::default();

    let Some(sheet) = entry.sheet else {
        log::debug!("No sheet mapped for {}", entry.name);
        return Ok((district, report));
    };
    if !titles.contains(sheet) {
        log::warn!("Sheet with title \"{}\" not found.", sheet);
        report.missing_tabs += 1;
        return Ok((district, report));
    }

    let rows = client.rows(sheet).await?;
    district.stats = collect_stats(sheet, &rows, &mut report);
    Ok((district, report))
}

/// Load every district in `table` from `client`, fetching the tabs
/// concurrently. Unmapped or missing tabs give a district with no stats;
/// any client error fails the whole load.
pub async fn load_districts<C: SheetClient + ?Sized>(
    client: &C,
    table: &[DistrictEntry],
) -> Result<(Vec<District>, LoadReport), SheetsError> {
    let titles: HashSet<String> = client.sheet_titles().await?.into_iter().collect();

    let loads = table
        .iter()
        .enumerate()
        .map(|(index, entry)| load_district(client, &titles, index, entry));
    let loaded = try_join_all(loads).await?;

    let mut report = LoadReport::default();
    let districts = loaded
        .into_iter()
        .map(|(district, r)| {
            report.merge(&r);
            district
        })
        .collect();
    Ok((districts, report))
}

/// Fetch all districts from the configured spreadsheet.
///
/// Returns `None` when no credentials are configured (no request is made) or
/// when anything goes wrong talking to the spreadsheet; callers fall back to
/// mock data in both cases.
pub async fn fetch_sheet_data(credentials: Option<&Credentials>) -> Option<Vec<District>> {
    let Some(credentials) = credentials else {
        log::warn!("Google Sheets credentials not found. Using mock data.");
        return None;
    };

    let result = async {
        let client = GoogleSheetsClient::connect(credentials).await?;
        load_districts(&client, &DISTRICTS).await
    }
    .await;

    match result {
        Ok((districts, report)) => {
            log::info!(
                "Loaded {} sheet rows ({} kept, {} dropped, {} duplicate dates, {} missing tabs)",
                report.total_rows,
                report.kept_rows,
                report.dropped_rows,
                report.duplicate_dates,
                report.missing_tabs
            );
            Some(districts)
        }
        Err(e) => {
            log::error!("Error fetching from Google Sheets: {}", e);
            None
        }
    }
}

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct SpreadsheetInfo {
    #[serde(default)]
    sheets: Vec<SheetInfo>,
}

#[derive(Deserialize)]
struct SheetInfo {
    properties: SheetProperties,
}

#[derive(Deserialize)]
struct SheetProperties {
    title: String,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

/// Google Sheets v4 client authenticated as a service account.
pub struct GoogleSheetsClient {
    http: reqwest::Client,
    base: Url,
    spreadsheet_id: String,
    access_token: String,
}

impl GoogleSheetsClient {
    /// Sign a service-account assertion and trade it for an access token.
    pub async fn connect(credentials: &Credentials) -> Result<Self, SheetsError> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            iss: &credentials.client_email,
            scope: SCOPE,
            aud: TOKEN_URL,
            iat: now,
            exp: now + TOKEN_LIFETIME_SECS,
        };
        let key = EncodingKey::from_rsa_pem(credentials.private_key.as_bytes())?;
        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &key)?;

        let http = reqwest::Client::new();
        let resp = http
            .post(TOKEN_URL)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;
        let token: TokenResponse = ensure_success(resp).await?.json().await?;

        Ok(Self {
            http,
            base: Url::parse(SHEETS_API)?,
            spreadsheet_id: credentials.spreadsheet_id.clone(),
            access_token: token.access_token,
        })
    }

    fn url(&self, tail: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(&self.spreadsheet_id).extend(tail);
        }
        url
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T, SheetsError> {
        let resp = self.http.get(url).bearer_auth(&self.access_token).send().await?;
        Ok(ensure_success(resp).await?.json::<T>().await?)
    }
}

#[async_trait]
impl SheetClient for GoogleSheetsClient {
    async fn sheet_titles(&self) -> Result<Vec<String>, SheetsError> {
        let mut url = self.url(&[]);
        url.query_pairs_mut().append_pair("fields", "sheets.properties.title");
        let info: SpreadsheetInfo = self.get_json(url).await?;
        Ok(info.sheets.into_iter().map(|s| s.properties.title).collect())
    }

    async fn rows(&self, title: &str) -> Result<Vec<SheetRow>, SheetsError> {
        let range = a1_sheet_range(title);
        let mut url = self.url(&["values", range.as_str()]);
        // Raw values keep dates independent of the sheet's display locale.
        url.query_pairs_mut()
            .append_pair("valueRenderOption", "UNFORMATTED_VALUE")
            .append_pair("dateTimeRenderOption", "SERIAL_NUMBER");
        let values: ValueRange = self.get_json(url).await?;
        let grid: Vec<Vec<String>> = values
            .values
            .iter()
            .map(|row| row.iter().map(cell_text).collect())
            .collect();
        rows_from_values(title, grid)
    }
}

/// Text form of an unformatted cell. Whole numbers print without a fraction.
fn cell_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => i.to_string(),
            None => n.to_string(),
        },
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// A whole-tab range in A1 notation, e.g. `'ขท.สกล1'`.
fn a1_sheet_range(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

/// Split a value grid into header and data rows.
fn rows_from_values(title: &str, values: Vec<Vec<String>>) -> Result<Vec<SheetRow>, SheetsError> {
    let mut grid = values.into_iter();
    let Some(header) = grid.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<String> = header.iter().map(|h| h.trim().to_string()).collect();
    let data: Vec<Vec<String>> = grid.collect();
    if !data.is_empty() && headers.iter().all(String::is_empty) {
        return Err(SheetsError::Header(title.to_string()));
    }
    Ok(data.iter().map(|cells| SheetRow::from_cells(&headers, cells)).collect())
}

async fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response, SheetsError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(SheetsError::Api { status: status.as_u16(), body })
}
