//! Определение кодировки загруженного CSV.
//!
//! Экспорты из Excel на турецких машинах часто приходят в Windows-1254.
//! Детектор эвристический: BOM однозначно означает UTF-8, иначе ищем в
//! первых байтах характерные верхние коды турецких букв. Турецкий файл
//! без этих байтов в префиксе будет прочитан как UTF-8 — известное
//! ограничение, а не баг.

const BOM_UTF8: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Сколько байтов сканируем в поиске турецких кодов
const SCAN_LIMIT: usize = 1000;

/// Коды ğ/Ğ, ü/Ü, ş/Ş, ı/İ, ö/Ö, ç/Ç в Windows-1254.
/// В UTF-8 эти буквы кодируются парами 0xC3..0xC5 + хвост,
/// ни один из хвостов с этим набором не пересекается.
const TURKISH_1254_BYTES: [u8; 12] = [
    0xF0, 0xD0, // ğ Ğ
    0xFC, 0xDC, // ü Ü
    0xFE, 0xDE, // ş Ş
    0xFD, 0xDD, // ı İ
    0xF6, 0xD6, // ö Ö
    0xE7, 0xC7, // ç Ç
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectedEncoding {
    Utf8,
    Windows1254,
}

/// Определить кодировку буфера
pub fn detect(bytes: &[u8]) -> DetectedEncoding {
    if bytes.starts_with(&BOM_UTF8) {
        return DetectedEncoding::Utf8;
    }

    let has_turkish_byte = bytes
        .iter()
        .take(SCAN_LIMIT)
        .any(|b| TURKISH_1254_BYTES.contains(b));

    if has_turkish_byte {
        DetectedEncoding::Windows1254
    } else {
        DetectedEncoding::Utf8
    }
}

/// Декодировать весь буфер согласно определенной кодировке
pub fn decode(bytes: &[u8]) -> String {
    match detect(bytes) {
        DetectedEncoding::Utf8 => {
            let without_bom = bytes.strip_prefix(&BOM_UTF8[..]).unwrap_or(bytes);
            String::from_utf8_lossy(without_bom).into_owned()
        }
        DetectedEncoding::Windows1254 => {
            let (text, _, _) = encoding_rs::WINDOWS_1254.decode(bytes);
            text.into_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bom_always_wins() {
        // После BOM идет байт из турецкого набора — BOM все равно решает
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice("Ad,Telefon\n".as_bytes());
        bytes.push(0xFC);
        assert_eq!(detect(&bytes), DetectedEncoding::Utf8);
    }

    #[test]
    fn turkish_byte_in_prefix_selects_windows_1254() {
        // "Müşteri" в Windows-1254: ü=0xFC, ş=0xFE
        let bytes = [b'M', 0xFC, 0xFE, b't', b'e', b'r', b'i'];
        assert_eq!(detect(&bytes), DetectedEncoding::Windows1254);
    }

    #[test]
    fn plain_ascii_is_utf8() {
        assert_eq!(detect(b"Name,Phone\nAhmet,555\n"), DetectedEncoding::Utf8);
    }

    #[test]
    fn utf8_turkish_does_not_false_positive() {
        // UTF-8 пары для ü (0xC3 0xBC) и ş (0xC5 0x9F) не входят в набор 1254
        let text = "Müşteri Adı,Telefon\n";
        assert_eq!(detect(text.as_bytes()), DetectedEncoding::Utf8);
        assert_eq!(decode(text.as_bytes()), text);
    }

    #[test]
    fn decodes_windows_1254_buffer() {
        // "Müşteri Adı" в Windows-1254
        let bytes = [
            b'M', 0xFC, 0xFE, b't', b'e', b'r', b'i', b' ', b'A', b'd', 0xFD,
        ];
        assert_eq!(decode(&bytes), "Müşteri Adı");
    }

    #[test]
    fn bom_is_stripped_from_decoded_text() {
        let mut bytes = BOM_UTF8.to_vec();
        bytes.extend_from_slice(b"Ad,Telefon");
        assert_eq!(decode(&bytes), "Ad,Telefon");
    }

    #[test]
    fn turkish_byte_beyond_scan_limit_is_ignored() {
        let mut bytes = vec![b'a'; SCAN_LIMIT];
        bytes.push(0xFC);
        assert_eq!(detect(&bytes), DetectedEncoding::Utf8);
    }
}
