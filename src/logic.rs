//! Emoji Clicker formulas — pure functions, fully testable.
//!
//! Nothing here validates its inputs: negative or NaN values flow through
//! the arithmetic and the caller gets whatever falls out.

use rand::Rng;

use crate::state::{Achievements, AutoClickers, Prestige, Upgrades};

/// Default growth per level for upgrade costs.
pub const DEFAULT_COST_SCALING: f64 = 1.15;

/// Auto-clickers always scale by this factor per unit owned.
pub const AUTO_CLICKER_COST_SCALING: f64 = 1.15;

/// Offline progress is capped to one hour unless the caller says otherwise.
pub const DEFAULT_MAX_OFFLINE_SECS: f64 = 3600.0;

/// Lifetime emojis needed for the first prestige point.
pub const PRESTIGE_THRESHOLD: f64 = 1_000_000.0;

/// +2% click value per completed achievement.
const ACHIEVEMENT_BONUS: f64 = 0.02;

/// Magnitude suffixes, one per power of 1000.
pub const SUFFIXES: [&str; 12] = [
    "", "K", "M", "B", "T", "Qa", "Qi", "Sx", "Sp", "Oc", "No", "Dc",
];

/// 10^(tier*3) for each suffix tier.
const TIER_SCALES: [f64; 12] = [
    1.0, 1e3, 1e6, 1e9, 1e12, 1e15, 1e18, 1e21, 1e24, 1e27, 1e30, 1e33,
];

/// Particle symbols for click effects.
pub const EMOJIS: [&str; 10] = [
    "💎", "✨", "⭐", "🌟", "💫", "🎉", "🎊", "🔥", "💰", "🏆",
];

// ── Formatting ─────────────────────────────────────────────────────────

/// Compact display: `999` → "999", `1234567` → "1.23M", `1e36` → "1.00e+36".
pub fn format_number(num: f64) -> String {
    if num.is_nan() {
        return "NaN".to_string();
    }
    if num < 1000.0 {
        return number_to_string(num.floor());
    }

    let tier = (num.abs().log10() / 3.0).floor();
    if tier <= 0.0 {
        return number_to_string(num.floor());
    }
    if !num.is_finite() || tier >= SUFFIXES.len() as f64 {
        return to_exponential2(num);
    }

    let tier = tier as usize;
    format!("{}{}", to_fixed2(num / TIER_SCALES[tier]), SUFFIXES[tier])
}

/// Format a number with commas (e.g. 1234567.9 → "1,234,567").
pub fn format_with_commas(num: f64) -> String {
    let s = number_to_string(num.floor());
    // Only plain digit strings get grouped ("1e+21", "Infinity" pass through).
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return s;
    }

    let mut result = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    let grouped: String = result.chars().rev().collect();
    format!("{sign}{grouped}")
}

/// Render `seconds` as "1h 2m 5s", "2m 5s" or "5s".
pub fn format_time(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{hours}h {minutes}m {secs}s")
    } else if minutes > 0 {
        format!("{minutes}m {secs}s")
    } else {
        format!("{secs}s")
    }
}

/// Shortest round-trip decimal, laid out the way browsers print numbers:
/// plain digits up to 21 integer places, exponent form ("1e+21") beyond.
fn number_to_string(v: f64) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if v == 0.0 {
        return "0".to_string();
    }

    let sign = if v < 0.0 { "-" } else { "" };
    let sci = format!("{:e}", v.abs());
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    let n = exp + 1;

    let body = if k <= n && n <= 21 {
        format!("{}{}", digits, "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(n as usize);
        format!("{int}.{frac}")
    } else if -6 < n && n <= 0 {
        format!("0.{}{}", "0".repeat((-n) as usize), digits)
    } else {
        let (first, rest) = digits.split_at(1);
        let exp_sign = if n - 1 >= 0 { "+" } else { "-" };
        if rest.is_empty() {
            format!("{first}e{exp_sign}{}", (n - 1).abs())
        } else {
            format!("{first}.{rest}e{exp_sign}{}", (n - 1).abs())
        }
    };
    format!("{sign}{body}")
}

/// Two fractional digits. Exact ties round away from zero, so 1.125 → "1.13".
fn to_fixed2(v: f64) -> String {
    // Ties only exist for odd multiples of 1/8.
    let eighths = v * 8.0;
    if eighths.fract() == 0.0 && eighths.abs() < 9.0e15 && (eighths as i64) % 2 != 0 {
        let cents = (v * 100.0).abs().ceil().copysign(v);
        return format!("{:.2}", cents / 100.0);
    }
    format!("{v:.2}")
}

/// Scientific notation with two fractional digits and a signed exponent.
fn to_exponential2(v: f64) -> String {
    if !v.is_finite() {
        return number_to_string(v);
    }
    let s = format!("{v:.2e}");
    match s.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => s,
    }
}

// ── Rewards ────────────────────────────────────────────────────────────

/// JS-style truthiness: a missing, zero or NaN bonus is skipped entirely.
fn present(v: Option<f64>) -> Option<f64> {
    v.filter(|x| *x != 0.0 && !x.is_nan())
}

/// Emojis earned by a single manual click.
///
/// Multipliers are applied in a fixed order (click power, click multiplier,
/// prestige, achievements) so results are reproducible to the last bit.
pub fn calculate_click_value(
    base_value: f64,
    upgrades: &Upgrades,
    achievements: &Achievements,
    prestige: &Prestige,
) -> f64 {
    let mut value = base_value;

    if let Some(power) = present(upgrades.click_power) {
        value *= 2f64.powf(power);
    }
    if let Some(mult) = present(upgrades.click_multiplier) {
        value *= 1.0 + mult * 0.5;
    }
    if let Some(mult) = present(prestige.permanent_multiplier) {
        value *= mult;
    }

    let achievement_bonus = achievements.completed_count() as f64 * ACHIEVEMENT_BONUS;
    value *= 1.0 + achievement_bonus;

    value
}

/// Passive income from every owned auto-clicker, with global multipliers.
pub fn calculate_production_per_second(
    auto_clickers: &AutoClickers,
    upgrades: &Upgrades,
    prestige: &Prestige,
) -> f64 {
    let mut total: f64 = auto_clickers
        .values()
        .filter(|c| c.owned > 0)
        .map(|c| c.base_value * c.owned as f64)
        .sum();

    if let Some(mult) = present(upgrades.production_multiplier) {
        total *= 1.0 + mult * 0.25;
    }
    if let Some(bonus) = present(prestige.production_bonus) {
        total *= bonus;
    }

    total
}

/// Prestige points for a lifetime total: floor(sqrt(total / 1M)).
pub fn calculate_prestige_currency(total_emojis: f64) -> f64 {
    if total_emojis < PRESTIGE_THRESHOLD {
        return 0.0;
    }
    (total_emojis / PRESTIGE_THRESHOLD).sqrt().floor()
}

/// Production accumulated while the tab was closed, capped at `max_offline_secs`.
pub fn calculate_offline_progress(
    production_per_second: f64,
    seconds_elapsed: f64,
    max_offline_secs: f64,
) -> f64 {
    production_per_second * seconds_elapsed.min(max_offline_secs)
}

/// [`calculate_offline_progress`] with the one-hour cap.
pub fn calculate_offline_progress_default(production_per_second: f64, seconds_elapsed: f64) -> f64 {
    calculate_offline_progress(production_per_second, seconds_elapsed, DEFAULT_MAX_OFFLINE_SECS)
}

/// Streak bonus for rapid consecutive clicks.
pub fn calculate_combo_multiplier(combo_count: u32) -> f64 {
    match combo_count {
        0..=4 => 1.0,
        5..=9 => 1.5,
        10..=19 => 2.0,
        20..=49 => 3.0,
        _ => 5.0,
    }
}

/// Pick a particle symbol uniformly from [`EMOJIS`].
pub fn random_emoji<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    EMOJIS[rng.gen_range(0..EMOJIS.len())]
}

// ── Costs ──────────────────────────────────────────────────────────────

/// floor(base * scaling^level).
///
/// Growth factors like 1.15 have no exact binary form, so `100 * 1.15` lands
/// a hair under 115. A product within a few ulps below a whole number rounds
/// up to it; anything else floors as usual.
fn scaled_cost(base_cost: f64, scaling: f64, level: u32) -> f64 {
    let raw = base_cost * scaling.powf(level as f64);
    let up = raw.ceil();
    if up - raw <= raw.abs() * f64::EPSILON * 4.0 {
        up
    } else {
        raw.floor()
    }
}

/// Cost of the next level of an upgrade.
pub fn calculate_upgrade_cost(base_cost: f64, current_level: u32, scaling_factor: f64) -> f64 {
    scaled_cost(base_cost, scaling_factor, current_level)
}

/// [`calculate_upgrade_cost`] with the default 1.15 growth.
pub fn calculate_upgrade_cost_default(base_cost: f64, current_level: u32) -> f64 {
    calculate_upgrade_cost(base_cost, current_level, DEFAULT_COST_SCALING)
}

/// Cost of the next auto-clicker of a type.
pub fn calculate_auto_clicker_cost(base_cost: f64, owned: u32) -> f64 {
    scaled_cost(base_cost, AUTO_CLICKER_COST_SCALING, owned)
}

pub fn can_afford(cost: f64, currency: f64) -> bool {
    currency >= cost
}
