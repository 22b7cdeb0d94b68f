use buildandchill::window::*;

#[test]
fn default_is_1280x720_windowed() {
    let cfg = WindowConfig::default();
    assert_eq!(cfg.width, 1280);
    assert_eq!(cfg.height, 720);
    assert_eq!(cfg.mode, WindowMode::Windowed);
}

#[test]
fn aspect_ratio_1280x720() {
    let cfg = WindowConfig::default();
    let ratio = cfg.aspect_ratio();
    assert!((ratio - 16.0 / 9.0).abs() < 1e-5, "expected 16/9, got {ratio}");
}

#[test]
fn aspect_ratio_zero_height_returns_zero() {
    let cfg = WindowConfig { height: 0, ..WindowConfig::default() };
    assert_eq!(cfg.aspect_ratio(), 0.0);
}

#[test]
fn mode_toggles_back_and_forth() {
    assert_eq!(WindowMode::Windowed.toggled(), WindowMode::Borderless);
    assert_eq!(WindowMode::Windowed.toggled().toggled(), WindowMode::Windowed);
}
