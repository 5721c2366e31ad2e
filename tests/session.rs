use kinetic_notes::{
    AuthGate, KeyValueStore, KnError, MemoryKeyValueStore, Theme, ThemePreference, AUTH_KEY,
    THEME_KEY,
};

#[test]
fn login_accepts_only_the_built_in_credentials() {
    let kv = MemoryKeyValueStore::new();
    let auth = AuthGate::new(kv.clone());

    assert!(!auth.is_authenticated());
    assert!(!auth.login("admin", "wrong"));
    assert!(!auth.is_authenticated());

    assert!(auth.login("admin", "password"));
    assert!(auth.is_authenticated());
    assert_eq!(kv.get(AUTH_KEY).unwrap().as_deref(), Some("true"));
}

#[test]
fn logout_clears_the_persisted_flag() {
    let kv = MemoryKeyValueStore::new();
    let auth = AuthGate::new(kv.clone());
    auth.login("admin", "password");

    auth.logout();
    assert!(!auth.is_authenticated());
    assert_eq!(kv.get(AUTH_KEY).unwrap(), None);
    assert!(matches!(auth.require(), Err(KnError::NotAuthenticated)));
}

#[test]
fn corrupt_auth_state_counts_as_logged_out() {
    let kv = MemoryKeyValueStore::seeded(AUTH_KEY, "yes please");
    assert!(!AuthGate::new(kv).is_authenticated());
}

#[test]
fn login_succeeds_even_when_the_flag_cannot_be_stored() {
    let kv = MemoryKeyValueStore::new();
    kv.set_fail_writes(true);
    assert!(AuthGate::new(kv).login("admin", "password"));
}

#[test]
fn theme_defaults_to_system_and_round_trips() {
    let kv = MemoryKeyValueStore::new();
    let prefs = ThemePreference::new(kv.clone());
    assert_eq!(prefs.load(), Theme::System);

    prefs.save(Theme::Dark);
    assert_eq!(kv.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
    assert_eq!(ThemePreference::new(kv).load(), Theme::Dark);
}

#[test]
fn unknown_theme_value_falls_back_to_system() {
    let kv = MemoryKeyValueStore::seeded(THEME_KEY, "sepia");
    assert_eq!(ThemePreference::new(kv).load(), Theme::System);
}

#[test]
fn system_theme_resolves_from_preference() {
    assert_eq!(Theme::System.resolve(true), Theme::Dark);
    assert_eq!(Theme::System.resolve(false), Theme::Light);
    assert_eq!(Theme::Light.resolve(true), Theme::Light);
}
