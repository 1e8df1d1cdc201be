use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use serde::{Deserialize, Serialize};

use crate::match_log::{MatchLog, MatchRecord};

/// Current-season Premier League results feed.
pub const DEFAULT_CSV_URL: &str = "https://www.football-data.co.uk/mmz4281/2425/E0.csv";

const CACHE_VERSION: u32 = 1;
const CACHE_DIR: &str = "cornercast";
const CACHE_FILE: &str = "stats_feed.json";
/// Season files barely change intra-day; refresh at most hourly.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);
const REQUEST_TIMEOUT_SECS: u64 = 15;

static CLIENT: OnceCell<Client> = OnceCell::new();
static CACHE: Mutex<Option<FeedCacheFile>> = Mutex::new(None);

// Fixture calendars (FBRef and friends) spell teams differently than the
// stats CSV does. Best-effort bridge; unknown names pass through untouched.
static NAME_MAP: &[(&str, &str)] = &[
    ("Manchester Utd", "Man United"),
    ("Manchester United", "Man United"),
    ("Manchester City", "Man City"),
    ("Nott'ham Forest", "Nott'm Forest"),
    ("Nottingham Forest", "Nott'm Forest"),
    ("Sheffield Utd", "Sheffield United"),
    ("Wolverhampton", "Wolves"),
    ("Wolverhampton Wanderers", "Wolves"),
    ("Newcastle Utd", "Newcastle"),
    ("Tottenham", "Spurs"),
    ("Tottenham Hotspur", "Spurs"),
    ("Luton Town", "Luton"),
    ("Ipswich Town", "Ipswich"),
    ("Leicester City", "Leicester"),
    ("West Ham United", "West Ham"),
];

pub fn normalize_team(name: &str) -> &str {
    let trimmed = name.trim();
    NAME_MAP
        .iter()
        .find(|(from, _)| *from == trimmed)
        .map(|(_, to)| *to)
        .unwrap_or(trimmed)
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct FeedCacheFile {
    version: u32,
    entries: HashMap<String, CacheEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    body: String,
    fetched_at: u64,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Date")]
    date: Option<String>,
    #[serde(rename = "HomeTeam")]
    home_team: Option<String>,
    #[serde(rename = "AwayTeam")]
    away_team: Option<String>,
    #[serde(rename = "Referee")]
    referee: Option<String>,
    #[serde(rename = "FTHG")]
    home_goals: Option<u32>,
    #[serde(rename = "FTAG")]
    away_goals: Option<u32>,
    #[serde(rename = "HS")]
    home_shots: Option<u32>,
    #[serde(rename = "AS")]
    away_shots: Option<u32>,
    #[serde(rename = "HST")]
    home_shots_on_target: Option<u32>,
    #[serde(rename = "AST")]
    away_shots_on_target: Option<u32>,
    #[serde(rename = "HC")]
    home_corners: Option<u32>,
    #[serde(rename = "AC")]
    away_corners: Option<u32>,
    #[serde(rename = "HF")]
    home_fouls: Option<u32>,
    #[serde(rename = "AF")]
    away_fouls: Option<u32>,
    #[serde(rename = "HY")]
    home_yellows: Option<u32>,
    #[serde(rename = "AY")]
    away_yellows: Option<u32>,
    #[serde(rename = "HR")]
    home_reds: Option<u32>,
    #[serde(rename = "AR")]
    away_reds: Option<u32>,
}

impl CsvRow {
    fn into_record(self) -> Option<MatchRecord> {
        Some(MatchRecord {
            date: parse_feed_date(self.date.as_deref()?)?,
            home_team: non_empty(self.home_team?)?,
            away_team: non_empty(self.away_team?)?,
            referee: self.referee.unwrap_or_default().trim().to_string(),
            home_goals: self.home_goals?,
            away_goals: self.away_goals?,
            home_shots: self.home_shots?,
            away_shots: self.away_shots?,
            home_shots_on_target: self.home_shots_on_target?,
            away_shots_on_target: self.away_shots_on_target?,
            home_corners: self.home_corners?,
            away_corners: self.away_corners?,
            home_fouls: self.home_fouls?,
            away_fouls: self.away_fouls?,
            home_yellows: self.home_yellows?,
            away_yellows: self.away_yellows?,
            home_reds: self.home_reds?,
            away_reds: self.away_reds?,
        })
    }
}

/// Fetch the season CSV (honoring the on-disk TTL cache) and parse it into a
/// repository snapshot.
pub fn load_match_log(url: &str, ttl: Duration) -> Result<MatchLog> {
    let (body, fetched_at) = fetch_cached(url, ttl)?;
    let records = parse_stats_csv(&body)?;
    let fetched_at: DateTime<Utc> = DateTime::from_timestamp(fetched_at as i64, 0)
        .unwrap_or_else(Utc::now);
    Ok(MatchLog::with_fetched_at(records, fetched_at))
}

/// Parse a football-data.co.uk results CSV. Rows missing any required column
/// are skipped whole; a record is never partially used.
pub fn parse_stats_csv(body: &str) -> Result<Vec<MatchRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(body.as_bytes());

    let mut out = Vec::new();
    for row in reader.deserialize::<CsvRow>() {
        let Ok(row) = row else {
            continue;
        };
        if let Some(record) = row.into_record() {
            out.push(record);
        }
    }
    if out.is_empty() {
        return Err(anyhow::anyhow!("stats csv produced no usable rows"));
    }
    Ok(out)
}

fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build http client")
    })
}

fn fetch_cached(url: &str, ttl: Duration) -> Result<(String, u64)> {
    let now = system_time_to_secs(SystemTime::now()).unwrap_or_default();
    {
        let mut guard = CACHE.lock().expect("feed cache lock poisoned");
        let cache = guard.get_or_insert_with(load_cache_file);
        if let Some(entry) = cache.entries.get(url)
            && now.saturating_sub(entry.fetched_at) < ttl.as_secs()
        {
            return Ok((entry.body.clone(), entry.fetched_at));
        }
    }

    let client = http_client()?;
    let resp = client
        .get(url)
        .header(USER_AGENT, "Mozilla/5.0")
        .send()
        .with_context(|| format!("stats feed request failed: {url}"))?;
    let status = resp.status();
    let body = resp.text().context("failed reading stats feed body")?;
    if !status.is_success() {
        // A stale cached body beats a hard failure.
        let mut guard = CACHE.lock().expect("feed cache lock poisoned");
        let cache = guard.get_or_insert_with(load_cache_file);
        if let Some(entry) = cache.entries.get(url) {
            return Ok((entry.body.clone(), entry.fetched_at));
        }
        return Err(anyhow::anyhow!("stats feed http {status}"));
    }

    refresh_cache_entry(
        url,
        CacheEntry {
            body: body.clone(),
            fetched_at: now,
        },
    );
    Ok((body, now))
}

fn refresh_cache_entry(key: &str, entry: CacheEntry) {
    let mut guard = CACHE.lock().expect("feed cache lock poisoned");
    let cache = guard.get_or_insert_with(load_cache_file);
    cache.version = CACHE_VERSION;
    cache.entries.insert(key.to_string(), entry);
    let _ = save_cache_file(cache);
}

fn load_cache_file() -> FeedCacheFile {
    let Some(path) = cache_path() else {
        return FeedCacheFile::default();
    };
    let Ok(raw) = fs::read_to_string(path) else {
        return FeedCacheFile::default();
    };
    let cache = serde_json::from_str::<FeedCacheFile>(&raw).unwrap_or_default();
    if cache.version != CACHE_VERSION {
        return FeedCacheFile::default();
    }
    cache
}

fn save_cache_file(cache: &FeedCacheFile) -> Result<()> {
    let Some(path) = cache_path() else {
        return Ok(());
    };
    let Some(dir) = path.parent() else {
        return Ok(());
    };
    fs::create_dir_all(dir).ok();
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string(cache).context("serialize feed cache")?;
    fs::write(&tmp, json).context("write feed cache")?;
    fs::rename(&tmp, &path).context("swap feed cache")?;
    Ok(())
}

fn cache_path() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CACHE_HOME")
        && !base.trim().is_empty()
    {
        return Some(PathBuf::from(base).join(CACHE_DIR).join(CACHE_FILE));
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".cache")
            .join(CACHE_DIR)
            .join(CACHE_FILE),
    )
}

fn system_time_to_secs(time: SystemTime) -> Option<u64> {
    time.duration_since(UNIX_EPOCH).ok().map(|d| d.as_secs())
}

fn parse_feed_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    // Recent seasons use dd/mm/yyyy, older files dd/mm/yy.
    NaiveDate::parse_from_str(raw, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d/%m/%y"))
        .ok()
}

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Div,Date,Time,HomeTeam,AwayTeam,Referee,FTHG,FTAG,HS,AS,HST,AST,HC,AC,HF,AF,HY,AY,HR,AR
E0,17/08/2024,12:30,Man United,Fulham,R Jones,1,0,14,10,5,3,7,4,12,9,2,3,0,0
E0,17/08/2024,15:00,Ipswich,Liverpool,T Robinson,0,2,8,18,2,7,3,9,10,8,1,1,0,0
E0,bad-date,15:00,Arsenal,Wolves,M Oliver,2,0,,,,,,,,,,,,
";

    #[test]
    fn parses_good_rows_and_skips_bad() {
        let records = parse_stats_csv(SAMPLE).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].home_team, "Man United");
        assert_eq!(records[0].home_corners, 7);
        assert_eq!(records[1].away_team, "Liverpool");
        assert_eq!(records[1].date.to_string(), "2024-08-17");
    }

    #[test]
    fn all_bad_rows_is_an_error() {
        assert!(parse_stats_csv("Date,HomeTeam\nnope,\n").is_err());
    }

    #[test]
    fn date_formats_both_parse() {
        assert!(parse_feed_date("17/08/2024").is_some());
        assert!(parse_feed_date("17/08/24").is_some());
        assert!(parse_feed_date("2024-08-17").is_none());
    }

    #[test]
    fn name_map_bridges_fixture_spellings() {
        assert_eq!(normalize_team("Manchester Utd"), "Man United");
        assert_eq!(normalize_team("Tottenham"), "Spurs");
        assert_eq!(normalize_team("Arsenal"), "Arsenal");
        assert_eq!(normalize_team("  Wolves "), "Wolves");
    }
}
