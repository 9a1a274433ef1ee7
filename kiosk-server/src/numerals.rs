//! Spoken-form numerals for queue announcements
//!
//! Ticket numbers are announced in Traditional Chinese, so the synthesis
//! text needs the numeral spelled out (21 → 二十一, 105 → 一百零五).

const DIGITS: [&str; 10] = ["零", "一", "二", "三", "四", "五", "六", "七", "八", "九"];

/// Render a ticket number (0..=999) as a spoken Chinese numeral
pub fn spoken_numeral(n: u32) -> String {
    match n {
        0..=9 => DIGITS[n as usize].to_string(),
        10..=19 => {
            let ones = (n % 10) as usize;
            if ones == 0 {
                "十".to_string()
            } else {
                format!("十{}", DIGITS[ones])
            }
        }
        20..=99 => {
            let tens = (n / 10) as usize;
            let ones = (n % 10) as usize;
            if ones == 0 {
                format!("{}十", DIGITS[tens])
            } else {
                format!("{}十{}", DIGITS[tens], DIGITS[ones])
            }
        }
        _ => {
            let hundreds = (n / 100) as usize;
            let rem = n % 100;
            let s = format!("{}百", DIGITS[hundreds % 10]);
            match rem {
                0 => s,
                1..=9 => format!("{}零{}", s, DIGITS[rem as usize]),
                _ => {
                    let tens = (rem / 10) as usize;
                    let ones = (rem % 10) as usize;
                    if ones == 0 {
                        format!("{}{}十", s, DIGITS[tens])
                    } else {
                        format!("{}{}十{}", s, DIGITS[tens], DIGITS[ones])
                    }
                }
            }
        }
    }
}

/// Full announcement phrase for a ticket number
pub fn announcement_text(n: u32) -> String {
    format!("請 {} 號取餐", spoken_numeral(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_digits() {
        assert_eq!(spoken_numeral(0), "零");
        assert_eq!(spoken_numeral(5), "五");
        assert_eq!(spoken_numeral(9), "九");
    }

    #[test]
    fn teens() {
        assert_eq!(spoken_numeral(10), "十");
        assert_eq!(spoken_numeral(15), "十五");
        assert_eq!(spoken_numeral(19), "十九");
    }

    #[test]
    fn tens() {
        assert_eq!(spoken_numeral(20), "二十");
        assert_eq!(spoken_numeral(21), "二十一");
        assert_eq!(spoken_numeral(99), "九十九");
    }

    #[test]
    fn hundreds() {
        assert_eq!(spoken_numeral(100), "一百");
        assert_eq!(spoken_numeral(105), "一百零五");
        assert_eq!(spoken_numeral(110), "一百一十");
        assert_eq!(spoken_numeral(999), "九百九十九");
    }

    #[test]
    fn announcement_wraps_numeral() {
        assert_eq!(announcement_text(21), "請 二十一 號取餐");
    }
}
