//! Развертывание правила повторения в упорядоченный список дат.
//!
//! Чистая календарная арифметика, без side-effect'ов. Гарантии:
//! каждая дата в [start_date, end_date], строгое возрастание,
//! без дубликатов, итерация всегда конечна.

use anyhow::{bail, Result};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use contracts::usecases::u502_recurring_orders::{RecurrenceKind, RecurrenceRule};

/// День недели из индекса 0-6, где 0 = воскресенье (нумерация UI-слоя)
fn weekday_from_index(index: u8) -> Result<Weekday> {
    Ok(match index {
        0 => Weekday::Sun,
        1 => Weekday::Mon,
        2 => Weekday::Tue,
        3 => Weekday::Wed,
        4 => Weekday::Thu,
        5 => Weekday::Fri,
        6 => Weekday::Sat,
        other => bail!("anchor_weekday must be 0-6, got {}", other),
    })
}

/// Развернуть правило в даты создания нарядов
pub fn generate_dates(rule: &RecurrenceRule) -> Result<Vec<NaiveDate>> {
    if rule.end_date < rule.start_date {
        bail!("end_date must not be before start_date");
    }

    match rule.kind {
        RecurrenceKind::Weekly => every_n_days(rule, 7),
        RecurrenceKind::Biweekly => every_n_days(rule, 14),
        RecurrenceKind::MonthlyDate => monthly_by_date(rule),
        RecurrenceKind::MonthlyWeekday => monthly_by_weekday(rule),
    }
}

/// weekly/biweekly: первая дата на/после start с нужным днем недели,
/// дальше фиксированный шаг, пока не перешагнули end
fn every_n_days(rule: &RecurrenceRule, step_days: i64) -> Result<Vec<NaiveDate>> {
    let target = weekday_from_index(require(rule.anchor_weekday, "anchor_weekday")?)?;

    let mut date = rule.start_date;
    while date.weekday() != target {
        date = date
            .succ_opt()
            .ok_or_else(|| anyhow::anyhow!("date out of calendar range"))?;
    }

    let step = Duration::days(step_days);
    let mut dates = Vec::new();
    while date <= rule.end_date {
        dates.push(date);
        date = date + step;
    }
    Ok(dates)
}

/// monthly_date: заданное число каждого месяца диапазона.
/// Месяцы без такого числа (31-е в феврале) пропускаются, не
/// подтягиваются к последнему дню — поведение детерминированное.
fn monthly_by_date(rule: &RecurrenceRule) -> Result<Vec<NaiveDate>> {
    let day = require(rule.anchor_day_of_month, "anchor_day_of_month")?;
    if !(1..=31).contains(&day) {
        bail!("anchor_day_of_month must be 1-31, got {}", day);
    }

    let mut dates = Vec::new();
    for (year, month) in months_of(rule.start_date, rule.end_date) {
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            if date >= rule.start_date && date <= rule.end_date {
                dates.push(date);
            }
        }
    }
    Ok(dates)
}

/// monthly_weekday: N-е вхождение дня недели в каждом месяце
/// диапазона ("3-я среда"). N ограничено 1-4: четыре вхождения есть
/// в любом месяце, поэтому дата существует всегда.
fn monthly_by_weekday(rule: &RecurrenceRule) -> Result<Vec<NaiveDate>> {
    let week = require(rule.anchor_week_of_month, "anchor_week_of_month")?;
    if !(1..=4).contains(&week) {
        bail!("anchor_week_of_month must be 1-4, got {}", week);
    }
    let target = weekday_from_index(require(rule.anchor_weekday, "anchor_weekday")?)?;

    let mut dates = Vec::new();
    for (year, month) in months_of(rule.start_date, rule.end_date) {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| anyhow::anyhow!("invalid month {}-{}", year, month))?;

        let offset = (target.num_days_from_sunday() + 7 - first.weekday().num_days_from_sunday()) % 7;
        let day = 1 + offset + (week - 1) * 7;

        // day <= 28, поэтому дата существует в любом месяце
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| anyhow::anyhow!("invalid day {} in {}-{}", day, year, month))?;

        if date >= rule.start_date && date <= rule.end_date {
            dates.push(date);
        }
    }
    Ok(dates)
}

/// Календарные месяцы от месяца start до месяца end включительно
fn months_of(start: NaiveDate, end: NaiveDate) -> Vec<(i32, u32)> {
    let mut months = Vec::new();
    let (mut year, mut month) = (start.year(), start.month());
    loop {
        months.push((year, month));
        if (year, month) == (end.year(), end.month()) {
            break;
        }
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }
    months
}

fn require<T: Copy>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| anyhow::anyhow!("{} is required for this recurrence kind", field))
}
