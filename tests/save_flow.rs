//! End-to-end: play a bit, save, come back later, collect offline progress.

use emoji_clicker::logic;
use emoji_clicker::{
    AutoClicker, GameState, ManualClock, MemoryStorage, SaveManager, Storage, STORAGE_KEY,
};

const START_MS: f64 = 1_700_000_000_000.0;

fn playing_state() -> GameState {
    let mut state = GameState::default();
    state.emojis = 500.0;
    state.total_emojis = 2_500_000.0;
    state.upgrades.click_power = Some(2.0);
    state.upgrades.production_multiplier = Some(4.0);
    state.achievements.completed = vec!["first_click".into(), "first_cursor".into()];
    state.prestige.production_bonus = Some(1.5);
    state
        .auto_clickers
        .insert("cursor".into(), AutoClicker::new(0.5, 20));
    state
        .auto_clickers
        .insert("grandma".into(), AutoClicker::new(4.0, 5));
    state
}

#[test]
fn offline_progress_after_reload() {
    let storage = MemoryStorage::new();
    let clock = ManualClock::new(START_MS);
    let mgr = SaveManager::with_clock(&storage, &clock);

    let state = playing_state();
    assert!(!mgr.has_save());
    assert!(mgr.save_game(&state));
    assert!(mgr.has_save());

    // Two hours away; offline credit is capped at one.
    clock.advance_secs(7200.0);
    let elapsed = mgr.time_since_last_save();
    assert_eq!(elapsed, 7200);

    let loaded = mgr.load_state().unwrap();
    let pps = logic::calculate_production_per_second(
        &loaded.auto_clickers,
        &loaded.upgrades,
        &loaded.prestige,
    );
    // (10 + 20) * (1 + 4*0.25) * 1.5
    assert_eq!(pps, 90.0);

    let earned = logic::calculate_offline_progress_default(pps, elapsed as f64);
    assert_eq!(earned, 90.0 * 3600.0);
    assert_eq!(logic::format_number(earned), "324.00K");
    assert_eq!(logic::format_time(elapsed), "2h 0m 0s");
}

#[test]
fn loaded_state_drives_formulas_like_the_original() {
    let storage = MemoryStorage::new();
    let mgr = SaveManager::with_clock(&storage, ManualClock::new(START_MS));
    let state = playing_state();
    assert!(mgr.save_game(&state));

    let loaded = mgr.load_state().unwrap();
    assert_eq!(loaded.emojis, state.emojis);
    assert_eq!(loaded.auto_clickers, state.auto_clickers);

    let click = |s: &GameState| {
        logic::calculate_click_value(1.0, &s.upgrades, &s.achievements, &s.prestige)
    };
    assert_eq!(click(&loaded), click(&state));
    assert_eq!(
        logic::calculate_prestige_currency(loaded.total_emojis),
        1.0
    );
}

#[test]
fn export_import_moves_save_between_devices() {
    let laptop = MemoryStorage::new();
    let phone = MemoryStorage::new();
    let laptop_mgr = SaveManager::with_clock(&laptop, ManualClock::new(START_MS));
    let phone_mgr = SaveManager::with_clock(&phone, ManualClock::new(START_MS + 5_000.0));

    assert!(phone_mgr.export_save().is_none());
    assert!(laptop_mgr.save_game(&playing_state()));

    let code = laptop_mgr.export_save().unwrap();
    assert!(phone_mgr.import_save(&code));
    assert_eq!(phone.get(STORAGE_KEY).unwrap(), laptop.get(STORAGE_KEY).unwrap());
    assert_eq!(phone_mgr.time_since_last_save(), 5);
}

#[test]
fn rejected_import_leaves_slot_untouched() {
    let storage = MemoryStorage::new();
    let mgr = SaveManager::with_clock(&storage, ManualClock::new(START_MS));
    assert!(mgr.save_game(&playing_state()));
    let before = storage.get(STORAGE_KEY).unwrap();

    assert!(!mgr.import_save("eyJlbW9qaXMiOjF9")); // {"emojis":1}
    assert!(!mgr.import_save("%%%"));
    assert_eq!(storage.get(STORAGE_KEY).unwrap(), before);
}

#[test]
fn delete_then_has_save_is_false() {
    let storage = MemoryStorage::new();
    let mgr = SaveManager::with_clock(&storage, ManualClock::new(START_MS));
    assert!(mgr.save_game(&playing_state()));
    assert!(mgr.delete_save());
    assert!(!mgr.has_save());
    assert!(mgr.load_game().is_none());
    assert_eq!(mgr.time_since_last_save(), 0);
}
