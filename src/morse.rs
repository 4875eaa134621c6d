use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::settings::Settings;

/// A single keyed element of a character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    Dit,
    Dah,
}

/// International Morse pattern for `c`, as dots and dashes
pub fn pattern(c: char) -> Option<&'static str> {
    let p = match c.to_ascii_uppercase() {
        'A' => ".-",
        'B' => "-...",
        'C' => "-.-.",
        'D' => "-..",
        'E' => ".",
        'F' => "..-.",
        'G' => "--.",
        'H' => "....",
        'I' => "..",
        'J' => ".---",
        'K' => "-.-",
        'L' => ".-..",
        'M' => "--",
        'N' => "-.",
        'O' => "---",
        'P' => ".--.",
        'Q' => "--.-",
        'R' => ".-.",
        'S' => "...",
        'T' => "-",
        'U' => "..-",
        'V' => "...-",
        'W' => ".--",
        'X' => "-..-",
        'Y' => "-.--",
        'Z' => "--..",
        '0' => "-----",
        '1' => ".----",
        '2' => "..---",
        '3' => "...--",
        '4' => "....-",
        '5' => ".....",
        '6' => "-....",
        '7' => "--...",
        '8' => "---..",
        '9' => "----.",
        '.' => ".-.-.-",
        ',' => "--..--",
        '?' => "..--..",
        '\'' => ".----.",
        '!' => "-.-.--",
        '/' => "-..-.",
        '(' => "-.--.",
        ')' => "-.--.-",
        '&' => ".-...",
        ':' => "---...",
        ';' => "-.-.-.",
        '=' => "-...-",
        '+' => ".-.-.",
        '-' => "-....-",
        '_' => "..--.-",
        '"' => ".-..-.",
        '$' => "...-..-",
        '@' => ".--.-.",
        _ => return None,
    };
    Some(p)
}

/// Offsets from the start of the send at which each element is triggered.
///
/// Elements of one character are separated by one dit duration, characters by
/// `letter_break` and words by `word_break`. Characters without a pattern are
/// skipped.
pub fn schedule(text: &str, settings: &Settings) -> Vec<(Duration, Element)> {
    let dit = settings.dit.duration as f64;
    let dah = settings.dah.duration as f64;
    let letter_break = settings.letter_break as f64;
    let word_break = settings.word_break as f64;

    let mut out = Vec::new();
    let mut t = 0.0f64;
    let mut first_word = true;

    for word in text.split_whitespace() {
        let letters: Vec<&str> = word.chars().filter_map(pattern).collect();
        if letters.is_empty() {
            continue;
        }
        if !first_word {
            t += word_break;
        }
        first_word = false;

        for (li, letter) in letters.iter().enumerate() {
            if li > 0 {
                t += letter_break;
            }
            for (ei, symbol) in letter.chars().enumerate() {
                if ei > 0 {
                    t += dit;
                }
                let element = if symbol == '.' {
                    Element::Dit
                } else {
                    Element::Dah
                };
                out.push((Duration::from_secs_f64(t), element));
                t += match element {
                    Element::Dit => dit,
                    Element::Dah => dah,
                };
            }
        }
    }
    out
}

/// Queue of timed dit/dah triggers released as the UI clock passes them
pub struct MorseSender {
    queue: VecDeque<(Instant, Element)>,
}

impl MorseSender {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Replace any in-progress send. Returns the number of queued elements.
    pub fn send(&mut self, text: &str, settings: &Settings, now: Instant) -> usize {
        self.queue = schedule(text, settings)
            .into_iter()
            .filter_map(|(offset, element)| now.checked_add(offset).map(|at| (at, element)))
            .collect();
        self.queue.len()
    }

    pub fn cancel(&mut self) {
        self.queue.clear();
    }

    pub fn is_sending(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Pop every element whose trigger time has been reached.
    pub fn due(&mut self, now: Instant) -> Vec<Element> {
        let mut ready = Vec::new();
        while let Some(&(at, element)) = self.queue.front() {
            if at > now {
                break;
            }
            ready.push(element);
            self.queue.pop_front();
        }
        ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SettingsStore;

    fn secs(offsets: &[(Duration, Element)]) -> Vec<f64> {
        offsets.iter().map(|(d, _)| d.as_secs_f64()).collect()
    }

    fn close(a: &[f64], b: &[f64]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-5)
    }

    #[test]
    fn elements_within_a_letter_are_one_dit_apart() {
        let s = Settings::default();
        let plan = schedule("a", &s);
        assert_eq!(
            plan.iter().map(|(_, e)| *e).collect::<Vec<_>>(),
            vec![Element::Dit, Element::Dah]
        );
        assert!(close(&secs(&plan), &[0.0, 0.3]));
    }

    #[test]
    fn letters_use_letter_break() {
        let s = Settings::default();
        // E ends at 0.15, then 0.45 of silence
        assert!(close(&secs(&schedule("et", &s)), &[0.0, 0.6]));
    }

    #[test]
    fn words_use_word_break() {
        let s = Settings::default();
        assert!(close(&secs(&schedule("e  e", &s)), &[0.0, 1.2]));
    }

    #[test]
    fn unknown_characters_are_skipped() {
        let s = Settings::default();
        assert!(schedule("~ ^^", &s).is_empty());
        assert_eq!(schedule("s#", &s).len(), 3);
    }

    #[test]
    fn huge_configured_gaps_do_not_overflow() {
        let settings = Settings {
            letter_break: 1e30,
            word_break: 1e30,
            ..Settings::default()
        };
        let store = SettingsStore::new(settings);
        let plan = schedule("et e", store.settings());
        assert_eq!(plan.len(), 3);
        let mut sender = MorseSender::new();
        assert_eq!(sender.send("et e", store.settings(), Instant::now()), 3);
    }

    #[test]
    fn sender_releases_elements_on_time() {
        let s = Settings::default();
        let t0 = Instant::now();
        let mut sender = MorseSender::new();
        assert_eq!(sender.send("sos", &s, t0), 9);
        assert_eq!(sender.due(t0), vec![Element::Dit]);
        assert!(sender.due(t0 + Duration::from_millis(100)).is_empty());
        assert_eq!(
            sender.due(t0 + Duration::from_millis(650)),
            vec![Element::Dit, Element::Dit]
        );
        sender.cancel();
        assert!(!sender.is_sending());
    }
}
