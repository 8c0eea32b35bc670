// src/tools/time.rs
//! Unix timestamps, time-zone conversion and a world clock. Calendar math is
//! plain integer arithmetic; zone rules come from the browser's `Intl`.
use gloo_timers::callback::Interval;
use js_sys::{Array, Date, Intl, Object, Reflect};
use wasm_bindgen::JsValue;
use yew::prelude::*;

use crate::widgets::{bind_input, bind_select, copy_with_message, js_message, msg_view};

/// `Date` accepts at most ±100,000,000 days around the epoch.
pub const MAX_EPOCH_MS: i64 = 8_640_000_000_000_000;

const MS_PER_DAY: i64 = 86_400_000;

/// Selectable zones; an empty id means the browser's own zone.
pub const ZONES: [(&str, &str); 12] = [
    ("Local (browser)", ""),
    ("UTC", "UTC"),
    ("New York (EST/EDT)", "America/New_York"),
    ("Los Angeles (PST/PDT)", "America/Los_Angeles"),
    ("London (GMT/BST)", "Europe/London"),
    ("Paris (CET/CEST)", "Europe/Paris"),
    ("Tokyo (JST)", "Asia/Tokyo"),
    ("Sydney (AEST/AEDT)", "Australia/Sydney"),
    ("Dubai (GST)", "Asia/Dubai"),
    ("Shanghai (CST)", "Asia/Shanghai"),
    ("Mumbai (IST)", "Asia/Kolkata"),
    ("São Paulo (BRT)", "America/Sao_Paulo"),
];

pub const CITIES: [(&str, &str); 10] = [
    ("New York", "America/New_York"),
    ("London", "Europe/London"),
    ("Tokyo", "Asia/Tokyo"),
    ("Sydney", "Australia/Sydney"),
    ("Paris", "Europe/Paris"),
    ("Dubai", "Asia/Dubai"),
    ("Los Angeles", "America/Los_Angeles"),
    ("Shanghai", "Asia/Shanghai"),
    ("Mumbai", "Asia/Kolkata"),
    ("São Paulo", "America/Sao_Paulo"),
];

/* ---------- calendar ---------- */

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Seconds,
    Milliseconds,
}

impl TimeUnit {
    pub fn label(self) -> &'static str {
        match self {
            TimeUnit::Seconds => "seconds",
            TimeUnit::Milliseconds => "milliseconds",
        }
    }

    fn from_label(s: &str) -> Self {
        if s == "milliseconds" {
            TimeUnit::Milliseconds
        } else {
            TimeUnit::Seconds
        }
    }

    /// Values this large are almost certainly milliseconds (past 5138 AD in
    /// seconds).
    pub fn likely_for(value: i64) -> Self {
        if value.unsigned_abs() >= 100_000_000_000 {
            TimeUnit::Milliseconds
        } else {
            TimeUnit::Seconds
        }
    }
}

/// Wall-clock date and time with no zone attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Civil {
    pub year: i64,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

fn is_leap(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i64, month: u32) -> u32 {
    match month {
        2 if is_leap(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Days since 1970-01-01 in the proleptic Gregorian calendar.
fn days_from_civil(year: i64, month: u32, day: u32) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let m = month as i64;
    let doy = (153 * (if m > 2 { m - 3 } else { m + 9 }) + 2) / 5 + day as i64 - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = if mp < 10 { mp + 3 } else { mp - 9 } as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

impl Civil {
    /// Milliseconds since the epoch, reading the wall clock as UTC.
    pub fn epoch_ms(&self) -> i64 {
        let days = days_from_civil(self.year, self.month, self.day);
        let secs = self.hour as i64 * 3600 + self.minute as i64 * 60 + self.second as i64;
        days * MS_PER_DAY + secs * 1000
    }

    /// UTC wall clock of an instant; sub-second precision is dropped.
    pub fn from_epoch_ms(ms: i64) -> Self {
        let days = ms.div_euclid(MS_PER_DAY);
        let secs = ms.rem_euclid(MS_PER_DAY) / 1000;
        let (year, month, day) = civil_from_days(days);
        Civil {
            year,
            month,
            day,
            hour: (secs / 3600) as u32,
            minute: (secs % 3600 / 60) as u32,
            second: (secs % 60) as u32,
        }
    }

    /// Value for `<input type="datetime-local" step="1">`.
    pub fn to_input(&self) -> String {
        format!(
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }

    /// Builds from `Intl.DateTimeFormat.formatToParts` output.
    pub fn from_parts<'a>(parts: impl IntoIterator<Item = (&'a str, &'a str)>) -> Option<Self> {
        let (mut y, mut mo, mut d, mut h, mut mi, mut s) = (None, None, None, None, None, None);
        for (kind, value) in parts {
            match kind {
                "year" => y = value.parse::<i64>().ok(),
                "month" => mo = value.parse::<u32>().ok(),
                "day" => d = value.parse::<u32>().ok(),
                // some engines print midnight as 24 even with h23
                "hour" => h = value.parse::<u32>().ok().map(|h| h % 24),
                "minute" => mi = value.parse::<u32>().ok(),
                "second" => s = value.parse::<u32>().ok(),
                _ => {}
            }
        }
        Some(Civil {
            year: y?,
            month: mo?,
            day: d?,
            hour: h?,
            minute: mi?,
            second: s?,
        })
    }
}

/// Parses `YYYY-MM-DDTHH:MM[:SS]` (a space works in place of `T`).
pub fn parse_datetime(input: &str) -> Result<Civil, String> {
    let bad = || format!("Invalid date/time {:?}: expected YYYY-MM-DDTHH:MM[:SS]", input.trim());
    let s = input.trim();
    let (date, time) = s.split_once(['T', ' ']).ok_or_else(bad)?;

    let mut d = date.splitn(3, '-');
    let year = d.next().and_then(|v| v.parse::<i64>().ok()).ok_or_else(bad)?;
    let month = d.next().and_then(|v| v.parse::<u32>().ok()).ok_or_else(bad)?;
    let day = d.next().and_then(|v| v.parse::<u32>().ok()).ok_or_else(bad)?;

    let t: Vec<&str> = time.split(':').collect();
    if !(2..=3).contains(&t.len()) {
        return Err(bad());
    }
    let num = |v: &str| v.parse::<u32>().map_err(|_| bad());
    let hour = num(t[0])?;
    let minute = num(t[1])?;
    // fractional seconds are accepted and dropped
    let second = match t.get(2) {
        Some(v) => num(v.split('.').next().unwrap_or(v))?,
        None => 0,
    };

    if !(1..=12).contains(&month) {
        return Err(format!("Invalid month {month}"));
    }
    if day == 0 || day > days_in_month(year, month) {
        return Err(format!("Invalid day {day} for {year:04}-{month:02}"));
    }
    if hour > 23 || minute > 59 || second > 59 {
        return Err(bad());
    }
    Ok(Civil {
        year,
        month,
        day,
        hour,
        minute,
        second,
    })
}

/// Timestamp text in `unit` to epoch milliseconds.
pub fn parse_timestamp(input: &str, unit: TimeUnit) -> Result<i64, String> {
    let s = input.trim();
    if s.is_empty() {
        return Err("Enter a timestamp.".into());
    }
    let value: i64 = s
        .parse()
        .map_err(|_| format!("Invalid timestamp {s:?}: digits only, optionally negative"))?;
    let ms = match unit {
        TimeUnit::Seconds => value.checked_mul(1000),
        TimeUnit::Milliseconds => Some(value),
    };
    match ms {
        Some(ms) if ms.abs() <= MAX_EPOCH_MS => Ok(ms),
        _ => Err(format!("Timestamp {s} is out of range for a date")),
    }
}

pub fn timestamp_in(ms: i64, unit: TimeUnit) -> i64 {
    match unit {
        TimeUnit::Seconds => ms.div_euclid(1000),
        TimeUnit::Milliseconds => ms,
    }
}

/// `2024-03-05T07:08:09.010Z`
pub fn iso_utc(ms: i64) -> String {
    let c = Civil::from_epoch_ms(ms);
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
        c.year,
        c.month,
        c.day,
        c.hour,
        c.minute,
        c.second,
        ms.rem_euclid(1000)
    )
}

/// "in 3 hours", "5 minutes ago", "just now".
pub fn relative(delta_ms: i64) -> String {
    let secs = delta_ms.unsigned_abs() / 1000;
    if secs < 5 {
        return "just now".into();
    }
    let (n, unit) = match secs {
        s if s < 60 => (s, "second"),
        s if s < 3600 => (s / 60, "minute"),
        s if s < 86_400 => (s / 3600, "hour"),
        s if s < 30 * 86_400 => (s / 86_400, "day"),
        s if s < 365 * 86_400 => (s / (30 * 86_400), "month"),
        s => (s / (365 * 86_400), "year"),
    };
    let amount = format!("{n} {unit}{}", if n == 1 { "" } else { "s" });
    if delta_ms > 0 {
        format!("in {amount}")
    } else {
        format!("{amount} ago")
    }
}

/// `UTC`, `UTC+05:30`, `UTC-04:00`.
pub fn format_offset(minutes: i64) -> String {
    if minutes == 0 {
        return "UTC".into();
    }
    let sign = if minutes > 0 { '+' } else { '-' };
    let m = minutes.abs();
    format!("UTC{sign}{:02}:{:02}", m / 60, m % 60)
}

/// Instant of a wall-clock time in a zone whose offset (minutes east of UTC)
/// at a given instant is `offset_at`. Two passes settle DST transitions; a
/// time skipped by a spring-forward lands after the gap.
pub fn zoned_to_utc<F>(local: &Civil, offset_at: F) -> Result<i64, String>
where
    F: Fn(i64) -> Result<i64, String>,
{
    let naive = local.epoch_ms();
    let first = naive - offset_at(naive)? * 60_000;
    Ok(naive - offset_at(first)? * 60_000)
}

/* ---------- browser zone rules ---------- */

#[derive(Clone, Copy)]
enum Style {
    Full,
    Clock,
    Day,
}

fn formatter(zone: &str, fields: &[(&str, JsValue)]) -> Result<Intl::DateTimeFormat, String> {
    let options = Object::new();
    if !zone.is_empty() {
        Reflect::set(&options, &"timeZone".into(), &zone.into()).map_err(|e| js_message(&e))?;
    }
    for (key, value) in fields {
        Reflect::set(&options, &(*key).into(), value).map_err(|e| js_message(&e))?;
    }
    let locales = Array::of1(&"en-US".into());
    Ok(Intl::DateTimeFormat::new(&locales, &options))
}

fn format_in_zone(ms: i64, zone: &str, style: Style) -> Result<String, String> {
    let two = || JsValue::from_str("2-digit");
    let fields: Vec<(&str, JsValue)> = match style {
        Style::Full => vec![
            ("year", "numeric".into()),
            ("month", "long".into()),
            ("day", "numeric".into()),
            ("hour", two()),
            ("minute", two()),
            ("second", two()),
            ("hour12", JsValue::TRUE),
            ("timeZoneName", "short".into()),
        ],
        Style::Clock => vec![
            ("hour", two()),
            ("minute", two()),
            ("second", two()),
            ("hour12", JsValue::TRUE),
        ],
        Style::Day => vec![
            ("weekday", "short".into()),
            ("year", "numeric".into()),
            ("month", "short".into()),
            ("day", "numeric".into()),
        ],
    };
    let date = Date::new(&JsValue::from_f64(ms as f64));
    formatter(zone, &fields)?
        .format()
        .call1(&JsValue::UNDEFINED, &date)
        .map_err(|e| js_message(&e))?
        .as_string()
        .ok_or_else(|| "Date formatting returned no text".to_string())
}

/// Minutes east of UTC in `zone` at instant `ms`.
fn offset_minutes(ms: i64, zone: &str) -> Result<i64, String> {
    let date = Date::new(&JsValue::from_f64(ms as f64));
    if zone.is_empty() {
        return Ok(-(date.get_timezone_offset() as i64));
    }
    let two = || JsValue::from_str("2-digit");
    let fmt = formatter(
        zone,
        &[
            ("year", "numeric".into()),
            ("month", two()),
            ("day", two()),
            ("hour", two()),
            ("minute", two()),
            ("second", two()),
            ("hourCycle", "h23".into()),
        ],
    )?;
    let mut parts = Vec::new();
    for part in fmt.format_to_parts(&date).iter() {
        let field = |name: &str| {
            Reflect::get(&part, &name.into())
                .ok()
                .and_then(|v| v.as_string())
                .unwrap_or_default()
        };
        parts.push((field("type"), field("value")));
    }
    let wall = Civil::from_parts(parts.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .ok_or_else(|| format!("Could not read the wall clock of {zone}"))?;
    Ok((wall.epoch_ms() - ms.div_euclid(1000) * 1000) / 60_000)
}

fn zone_label(zone: &str) -> &'static str {
    ZONES
        .iter()
        .find(|(_, id)| *id == zone)
        .map(|(label, _)| *label)
        .unwrap_or("Local (browser)")
}

fn now_ms() -> i64 {
    Date::now() as i64
}

/* ---------- panel ---------- */

#[function_component(TimePanel)]
pub fn time_panel() -> Html {
    let now = use_state(now_ms);
    let unit = use_state(|| TimeUnit::Seconds.label().to_string());
    let stamp = use_state(|| timestamp_in(now_ms(), TimeUnit::Seconds).to_string());
    let src_zone = use_state(String::new);
    let dst_zone = use_state(|| "America/New_York".to_string());
    let wall = use_state(|| {
        let ms = now_ms();
        let offset = offset_minutes(ms, "").unwrap_or(0);
        Civil::from_epoch_ms(ms + offset * 60_000).to_input()
    });
    let msg = use_state(String::new);

    {
        let now = now.clone();
        use_effect_with((), move |_| {
            let handle = Interval::new(1000, move || now.set(now_ms()));
            || drop(handle)
        });
    }

    let unit_v = TimeUnit::from_label(&unit);
    let now_stamp = timestamp_in(*now, unit_v).to_string();
    let now_local = String::from(Date::new(&JsValue::from_f64(*now as f64)).to_string());

    let copy = |text: String, ok: &'static str| {
        let msg = msg.clone();
        Callback::from(move |_: MouseEvent| copy_with_message(text.clone(), msg.clone(), ok))
    };

    let on_use_now = {
        let stamp = stamp.clone();
        Callback::from(move |_: MouseEvent| stamp.set(timestamp_in(now_ms(), unit_v).to_string()))
    };

    // unix -> human
    let unix_out = match parse_timestamp(&stamp, unit_v) {
        Ok(ms) => {
            let iso = iso_utc(ms);
            let local = String::from(Date::new(&JsValue::from_f64(ms as f64)).to_string());
            let hint = stamp
                .trim()
                .parse::<i64>()
                .ok()
                .map(TimeUnit::likely_for)
                .filter(|u| *u != unit_v)
                .map(|u| format!("This looks like {}.", u.label()));
            html! {
                <>
                  <div class="kv">
                    <span class="tag">{ "UTC" }</span>
                    <span class="mono">{ iso.clone() }</span>
                    <button class="btn small" onclick={copy(iso, "Copied UTC time.")}>{ "Copy" }</button>
                  </div>
                  <div class="kv">
                    <span class="tag">{ "Local" }</span>
                    <span class="mono">{ local.clone() }</span>
                    <button class="btn small" onclick={copy(local, "Copied local time.")}>{ "Copy" }</button>
                  </div>
                  <div class="kv"><span class="tag">{ relative(ms - *now) }</span></div>
                  { for hint.map(|h| html! { <div class="warn">{ h }</div> }) }
                </>
            }
        }
        Err(e) if stamp.trim().is_empty() => html! { <div class="smallnote">{ e }</div> },
        Err(e) => html! { <div class="alert">{ e }</div> },
    };

    // zone -> zone
    let converted = parse_datetime(&wall).and_then(|civil| {
        let ms = zoned_to_utc(&civil, |at| offset_minutes(at, &src_zone))?;
        if ms.abs() > MAX_EPOCH_MS {
            return Err("Date is out of range".into());
        }
        let text = format_in_zone(ms, &dst_zone, Style::Full)?;
        let offset = offset_minutes(ms, &dst_zone)?;
        Ok((ms, text, offset))
    });
    let zone_out = match converted {
        Ok((ms, text, offset)) => html! {
            <>
              <div class="kv">
                <span class="tag">{ zone_label(&dst_zone) }</span>
                <span class="mono">{ text.clone() }</span>
                <span class="tag">{ format_offset(offset) }</span>
                <button class="btn small" onclick={copy(text, "Copied converted time.")}>{ "Copy" }</button>
              </div>
              <div class="kv">
                <span class="tag">{ "UTC" }</span><span class="mono">{ iso_utc(ms) }</span>
                <span class="tag">{ "Unix" }</span><span class="mono">{ timestamp_in(ms, TimeUnit::Seconds).to_string() }</span>
              </div>
            </>
        },
        Err(e) => html! { <div class="alert">{ e }</div> },
    };

    let on_swap = {
        let (src_zone, dst_zone) = (src_zone.clone(), dst_zone.clone());
        Callback::from(move |_: MouseEvent| {
            let a = (*src_zone).clone();
            src_zone.set((*dst_zone).clone());
            dst_zone.set(a);
        })
    };

    let zone_select = |state: &UseStateHandle<String>| {
        html! {
            <select onchange={bind_select(state.clone())}>
              { for ZONES.iter().map(|(label, id)| html! {
                  <option value={*id} selected={*id == state.as_str()}>{ *label }</option>
              }) }
            </select>
        }
    };

    let clock_rows = CITIES.iter().map(|(city, zone)| {
        let time = format_in_zone(*now, zone, Style::Clock).unwrap_or_else(|e| e);
        let day = format_in_zone(*now, zone, Style::Day).unwrap_or_default();
        html! {
            <tr>
              <td>{ *city }</td>
              <td class="mono">{ time }</td>
              <td>{ day }</td>
            </tr>
        }
    });

    html! {
        <div class="panel">
          <div class="block">
            <div class="block-head">
              <div class="block-title">{ "Unix Timestamp" }</div>
              <div class="btnrow">
                <select onchange={bind_select(unit.clone())}>
                  { for [TimeUnit::Seconds, TimeUnit::Milliseconds].into_iter().map(|u| html! {
                      <option value={u.label()} selected={u == unit_v}>{ u.label() }</option>
                  }) }
                </select>
                <button class="btn" onclick={on_use_now}>{ "Use current time" }</button>
              </div>
            </div>
            <div class="kv">
              <span class="tag">{ "Now" }</span>
              <span class="mono">{ now_stamp.clone() }</span>
              <button class="btn small" onclick={copy(now_stamp, "Copied current timestamp.")}>{ "Copy" }</button>
              <span class="smallnote">{ now_local.clone() }</span>
              <button class="btn small" onclick={copy(now_local, "Copied current date.")}>{ "Copy" }</button>
            </div>
            <div class="textline">
              <input type="text" class="mono" value={(*stamp).clone()} oninput={bind_input(stamp.clone())}
                     placeholder={format!("Unix timestamp in {}", unit_v.label())} />
            </div>
            { unix_out }
          </div>

          <div class="block">
            <div class="block-head">
              <div class="block-title">{ "Timezone Converter" }</div>
              <div class="btnrow"><button class="btn" onclick={on_swap}>{ "Swap zones" }</button></div>
            </div>
            <div class="textline">
              { zone_select(&src_zone) }
              <input type="datetime-local" step="1" value={(*wall).clone()} oninput={bind_input(wall.clone())} />
              { "→" }
              { zone_select(&dst_zone) }
            </div>
            { zone_out }
          </div>

          <div class="block">
            <div class="block-head">
              <div class="block-title">{ "World Clock" }</div>
              <span class="tag mono">{ iso_utc(*now) }</span>
            </div>
            <table class="matches">
              <tr><th>{ "City" }</th><th>{ "Time" }</th><th>{ "Date" }</th></tr>
              { for clock_rows }
            </table>
          </div>

          { msg_view(&msg) }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn civil(year: i64, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> Civil {
        Civil {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    #[test]
    fn epoch_math_matches_known_instants() {
        assert_eq!(civil(1970, 1, 1, 0, 0, 0).epoch_ms(), 0);
        assert_eq!(civil(2000, 3, 1, 0, 0, 0).epoch_ms(), 951_868_800_000);
        assert_eq!(civil(2038, 1, 19, 3, 14, 7).epoch_ms(), 2_147_483_647_000);
        assert_eq!(Civil::from_epoch_ms(-1), civil(1969, 12, 31, 23, 59, 59));
        assert_eq!(Civil::from_epoch_ms(1_709_596_800_000), civil(2024, 3, 5, 0, 0, 0));
        assert_eq!(Civil::from_epoch_ms(951_782_400_000), civil(2000, 2, 29, 0, 0, 0));
    }

    #[test]
    fn datetime_inputs_parse_and_reject() {
        assert_eq!(parse_datetime("2024-02-29T13:05").unwrap(), civil(2024, 2, 29, 13, 5, 0));
        assert_eq!(parse_datetime(" 2024-02-29 13:05:09.5 ").unwrap(), civil(2024, 2, 29, 13, 5, 9));
        assert_eq!(parse_datetime("2023-02-29T10:00").unwrap_err(), "Invalid day 29 for 2023-02");
        assert_eq!(parse_datetime("2024-13-01T10:00").unwrap_err(), "Invalid month 13");
        assert!(parse_datetime("2024-01-01T24:00").is_err());
        assert!(parse_datetime("yesterday").unwrap_err().starts_with("Invalid date/time"));
        assert_eq!(civil(2024, 2, 9, 7, 5, 3).to_input(), "2024-02-09T07:05:03");
    }

    #[test]
    fn timestamps_in_both_units() {
        assert_eq!(parse_timestamp("1700000000", TimeUnit::Seconds), Ok(1_700_000_000_000));
        assert_eq!(parse_timestamp(" 1700000000123 ", TimeUnit::Milliseconds), Ok(1_700_000_000_123));
        assert_eq!(parse_timestamp("-1", TimeUnit::Seconds), Ok(-1000));
        assert!(parse_timestamp("12abc", TimeUnit::Seconds).unwrap_err().starts_with("Invalid timestamp"));
        assert!(parse_timestamp("9999999999999999", TimeUnit::Seconds)
            .unwrap_err()
            .contains("out of range"));
        assert_eq!(parse_timestamp("", TimeUnit::Seconds).unwrap_err(), "Enter a timestamp.");

        assert_eq!(timestamp_in(1_700_000_000_999, TimeUnit::Seconds), 1_700_000_000);
        assert_eq!(timestamp_in(-1, TimeUnit::Seconds), -1);
        assert_eq!(TimeUnit::likely_for(1_700_000_000), TimeUnit::Seconds);
        assert_eq!(TimeUnit::likely_for(1_700_000_000_000), TimeUnit::Milliseconds);
    }

    #[test]
    fn iso_and_relative_labels() {
        assert_eq!(iso_utc(1_709_622_489_010), "2024-03-05T07:08:09.010Z");
        assert_eq!(iso_utc(-1), "1969-12-31T23:59:59.999Z");
        assert_eq!(relative(2_000), "just now");
        assert_eq!(relative(-90_000), "1 minute ago");
        assert_eq!(relative(3 * 3_600_000 + 5), "in 3 hours");
        assert_eq!(relative(-400 * MS_PER_DAY), "1 year ago");
        assert_eq!(format_offset(0), "UTC");
        assert_eq!(format_offset(330), "UTC+05:30");
        assert_eq!(format_offset(-240), "UTC-04:00");
    }

    #[test]
    fn wall_clock_parts_from_intl() {
        let parts = [
            ("month", "03"),
            ("literal", "/"),
            ("day", "05"),
            ("literal", "/"),
            ("year", "2024"),
            ("literal", ", "),
            ("hour", "24"),
            ("minute", "07"),
            ("second", "09"),
        ];
        assert_eq!(Civil::from_parts(parts), Some(civil(2024, 3, 5, 0, 7, 9)));
        assert_eq!(Civil::from_parts([("year", "2024")]), None);
    }

    #[test]
    fn zoned_times_resolve_to_utc() {
        let noon = civil(2024, 7, 1, 12, 0, 0);
        let ist = zoned_to_utc(&noon, |_| Ok(330)).unwrap();
        assert_eq!(iso_utc(ist), "2024-07-01T06:30:00.000Z");
        let ny = zoned_to_utc(&noon, |_| Ok(-240)).unwrap();
        assert_eq!(iso_utc(ny), "2024-07-01T16:00:00.000Z");

        // offset flips from -300 to -240 at 2024-03-10T07:00Z
        let switch = civil(2024, 3, 10, 7, 0, 0).epoch_ms();
        let eastern = move |at: i64| Ok(if at < switch { -300 } else { -240 });
        let before = zoned_to_utc(&civil(2024, 3, 10, 1, 30, 0), eastern).unwrap();
        assert_eq!(iso_utc(before), "2024-03-10T06:30:00.000Z");
        let after = zoned_to_utc(&civil(2024, 3, 10, 3, 30, 0), eastern).unwrap();
        assert_eq!(iso_utc(after), "2024-03-10T07:30:00.000Z");

        assert_eq!(
            zoned_to_utc(&noon, |_| Err("no zone".to_string())).unwrap_err(),
            "no zone"
        );
    }
}
