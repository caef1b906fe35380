use hanabira::storage::prefs::PROGRESS_KEY;
use hanabira::systems::weather::NIGHT_SET;
use hanabira::{
    ClickTarget, DecorApp, DecorConfig, DecorEvent, FixedClock, InputEvent, InputQueue, KeyValueStore,
    MemoryStore, PlayState, PreferenceStore, Preferences, ThemePreference,
};

const FRAME: f32 = 1.0 / 60.0;

fn app_on(page: &str, hour: u32, local: MemoryStore) -> DecorApp<MemoryStore> {
    let mut app = DecorApp::new(
        DecorConfig::default(),
        local,
        MemoryStore::new(),
        Box::new(FixedClock::new(hour, "2026-10-16")),
        page,
    );
    app.init();
    app
}

fn run_frames(app: &mut DecorApp<MemoryStore>, input: &mut InputQueue, frames: usize) {
    for _ in 0..frames {
        app.tick(FRAME, input);
    }
}

#[test]
fn hundred_particles_stay_bounded_over_a_thousand_steps() {
    let mut app = app_on("/index.html", 12, MemoryStore::new());
    let mut input = InputQueue::new();
    input.push(InputEvent::PointerMove { x: 640.0, y: 360.0, touch: false });
    run_frames(&mut app, &mut input, 1000);

    assert_eq!(app.particles().particles().len(), 100);
    for p in app.particles().particles() {
        assert!(p.pos.x >= -10.0 && p.pos.x <= 110.0, "x out of range: {}", p.pos.x);
        assert!(p.pos.y <= 110.0, "y out of range: {}", p.pos.y);
        assert!(p.life > 0.0 && p.life <= 1.0);
    }
    assert_eq!(app.render_buffer().viewport_split, 100);
}

#[test]
fn two_navigations_inside_the_wipe_navigate_once() {
    let mut app = app_on("/index.html", 12, MemoryStore::new());
    let mut input = InputQueue::new();
    assert!(app.link_clicked("sorry.html", false));
    run_frames(&mut app, &mut input, 12);
    input.push(InputEvent::LinkClicked { href: "third.html".into(), has_target: false });
    run_frames(&mut app, &mut input, 60);

    let navigations: Vec<_> = app
        .take_events()
        .into_iter()
        .filter_map(|e| match e {
            DecorEvent::Navigate { url } => Some(url),
            _ => None,
        })
        .collect();
    assert_eq!(navigations, vec!["sorry.html".to_string()]);
}

#[test]
fn external_links_pass_through() {
    let mut app = app_on("/index.html", 12, MemoryStore::new());
    assert!(!app.link_clicked("https://example.com/a.html", false));
    assert!(!app.transition().is_transitioning());
}

#[test]
fn save_then_load_round_trips_the_record() {
    let mut app = app_on("/sorry.html", 12, MemoryStore::new());
    let mut input = InputQueue::new();
    input.push(InputEvent::Click { target: ClickTarget { secret: true, ..ClickTarget::BUTTON } });
    input.push(InputEvent::Click { target: ClickTarget { accept: true, ..ClickTarget::BUTTON } });
    input.push(InputEvent::Input);
    run_frames(&mut app, &mut input, 1);
    app.set_theme_preference(ThemePreference::Night);
    app.set_music_enabled(false);
    app.set_volume(0.7);
    app.toggle_music();
    app.unload();

    let saved = app.preferences().clone();
    assert_eq!(saved.play_state, PlayState::Playing);
    assert!(!saved.achievements.is_empty());
    let blob = app
        .preference_store()
        .local()
        .get(PROGRESS_KEY)
        .unwrap()
        .expect("record persisted");

    let mut fresh = PreferenceStore::new(MemoryStore::new().with_entry(PROGRESS_KEY, &blob), MemoryStore::new());
    assert!(fresh.load());
    assert_eq!(fresh.preferences(), &saved);
}

#[test]
fn recording_a_secret_twice_counts_once() {
    let mut app = app_on("/index.html", 12, MemoryStore::new());
    let mut input = InputQueue::new();
    let secret = ClickTarget { secret: true, ..ClickTarget::BUTTON };
    input.push(InputEvent::Click { target: secret });
    input.push(InputEvent::Click { target: secret });
    run_frames(&mut app, &mut input, 1);
    assert_eq!(app.preferences().secrets_found.len(), 1);
    assert_eq!(app.stats().secrets_found, 1);
    assert_eq!(app.preferences().interactions, 2);
}

#[test]
fn night_rerolls_stay_in_the_night_set() {
    let mut app = app_on("/index.html", 23, MemoryStore::new());
    let mut input = InputQueue::new();
    let start = app.weather().generation();
    for _ in 0..6 {
        // One five-minute weather period.
        run_frames(&mut app, &mut input, 60 * 300);
        assert!(NIGHT_SET.contains(&app.weather().state().kind));
    }
    assert!(app.weather().generation() >= start);
}

#[test]
fn partial_record_loads_with_defaults() {
    let local = MemoryStore::new().with_entry(PROGRESS_KEY, r#"{"visitedPages": ["index.html"], "volume": "loud"}"#);
    let app = app_on("/third.html", 12, local);
    let p = app.preferences();
    let defaults = Preferences::default();
    assert_eq!(p.visited_pages, vec!["index.html", "third.html"]);
    assert_eq!(p.volume, defaults.volume);
    assert_eq!(p.music_enabled, defaults.music_enabled);
    assert_eq!(p.theme_preference, defaults.theme_preference);
    assert_eq!(app.progress_view().counter, "Page 3/4 • 2 pages visited");
}

#[test]
fn welcome_back_shows_after_two_seconds() {
    let local = MemoryStore::new().with_entry(PROGRESS_KEY, r#"{"visitedPages": ["index.html"]}"#);
    let mut app = app_on("/sorry.html", 12, local);
    app.take_events();
    let mut input = InputQueue::new();
    run_frames(&mut app, &mut input, 125);
    let messages: Vec<_> = app
        .take_events()
        .into_iter()
        .filter_map(|e| match e {
            DecorEvent::Notify(n) => Some(n.message),
            _ => None,
        })
        .collect();
    assert!(messages.contains(&"Welcome back! You've visited 2 pages.".to_string()));
}
