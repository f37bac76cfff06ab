//! Разбор строк CSV и нормализация в CustomerDraft.
//!
//! Формат терпимый к экспортам из электронных таблиц: разделитель
//! запятая или точка с запятой, заголовки в любых распространенных
//! написаниях (регистр и диакритика не важны), лишние кавычки вокруг
//! полей снимаются. Разделитель режет строку буквально, без
//! RFC 4180-кавычек — так ведет себя и принимающая сторона.

use chrono::NaiveDate;
use contracts::domain::a001_customer::CustomerDraft;
use std::collections::HashMap;

/// Одна строка данных: нормализованный заголовок -> значение ячейки.
/// Живет только внутри одного прогона импорта.
pub type ImportRow = HashMap<String, String>;

pub const DEFAULT_PHONE: &str = "0000000000";
pub const DEFAULT_ADDRESS: &str = "Adres belirtilmemiş";

// Упорядоченные списки алиасов для логических полей, уже в
// нормализованной форме (см. normalize_label). Берется первое
// непустое совпадение.

const NAME_ALIASES: &[&str] = &[
    "musteri adi",
    "musteri",
    "ad soyad",
    "adi soyadi",
    "isim",
    "ad",
    "name",
    "customer name",
    "customer",
];

const PHONE_ALIASES: &[&str] = &[
    "telefon",
    "telefon no",
    "tel",
    "gsm",
    "cep telefonu",
    "cep",
    "phone",
    "phone number",
    "mobile",
];

const ADDRESS_ALIASES: &[&str] = &["adres", "adres bilgisi", "address", "adress"];

/// Нормализация метки заголовка: убрать диакритику турецких букв,
/// привести к нижнему регистру. Турецкие İ/ı обрабатываются явно,
/// стандартный to_lowercase() дает для них комбинированные символы.
pub fn normalize_label(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.trim().chars() {
        let mapped = match c {
            'ç' | 'Ç' => 'c',
            'ğ' | 'Ğ' => 'g',
            'ı' | 'İ' => 'i',
            'ö' | 'Ö' => 'o',
            'ş' | 'Ş' => 's',
            'ü' | 'Ü' => 'u',
            other => other,
        };
        out.extend(mapped.to_lowercase());
    }
    out
}

/// Снять пробелы и одну пару обрамляющих двойных кавычек
fn clean_field(raw: &str) -> String {
    let trimmed = raw.trim();
    let unquoted = if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    };
    unquoted.trim().to_string()
}

fn split_line(line: &str, delimiter: char) -> Vec<String> {
    line.split(delimiter).map(clean_field).collect()
}

/// Разобрать декодированный текст в строки данных.
/// None — в файле нет ни одной непустой строки ("file empty or invalid").
/// Первая непустая строка — заголовок; короткие строки дополняются
/// пустыми значениями до числа колонок заголовка.
pub fn parse_rows(text: &str) -> Option<Vec<ImportRow>> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let (header_line, data_lines) = lines.split_first()?;

    let delimiter = if header_line.contains(';') { ';' } else { ',' };
    let headers: Vec<String> = split_line(header_line, delimiter)
        .iter()
        .map(|h| normalize_label(h))
        .collect();

    let rows = data_lines
        .iter()
        .map(|line| {
            let fields = split_line(line, delimiter);
            headers
                .iter()
                .enumerate()
                .map(|(i, header)| {
                    (header.clone(), fields.get(i).cloned().unwrap_or_default())
                })
                .collect()
        })
        .collect();

    Some(rows)
}

/// Первое непустое значение среди алиасов поля
fn resolve_field(row: &ImportRow, aliases: &[&str]) -> Option<String> {
    for alias in aliases {
        if let Some(value) = row.get(*alias) {
            if !value.trim().is_empty() {
                return Some(value.trim().to_string());
            }
        }
    }
    None
}

/// Имя считается отсутствующим, если пустое или мусорный экспорт
/// ("nan"/"null" из pandas/таблиц)
fn is_missing_name(value: &str) -> bool {
    value.is_empty()
        || value.eq_ignore_ascii_case("nan")
        || value.eq_ignore_ascii_case("null")
}

fn is_missing_phone(value: &str) -> bool {
    value.is_empty() || value == "0" || value.eq_ignore_ascii_case("nan")
}

/// Собрать CustomerDraft из одной строки.
/// display_row — номер строки для пользователя, 1-based с учетом
/// заголовка (номер строки данных + 1).
pub fn build_customer_draft(
    row: &ImportRow,
    display_row: usize,
    import_date: NaiveDate,
) -> Result<CustomerDraft, String> {
    let name = resolve_field(row, NAME_ALIASES).unwrap_or_default();
    if is_missing_name(&name) {
        return Err(format!("row {}: missing customer name", display_row));
    }

    // Телефон и адрес не фатальны: подставляем дефолты
    let phone = resolve_field(row, PHONE_ALIASES)
        .filter(|value| !is_missing_phone(value))
        .unwrap_or_else(|| DEFAULT_PHONE.to_string());

    let address = resolve_field(row, ADDRESS_ALIASES)
        .unwrap_or_else(|| DEFAULT_ADDRESS.to_string());

    let notes = format!("CSV içe aktarma - {}", import_date.format("%d.%m.%Y"));

    Ok(CustomerDraft::new(name, phone, address, notes))
}
