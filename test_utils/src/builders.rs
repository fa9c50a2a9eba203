//! Convenience constructors for templates and setups used in tests.

use skirmish::{BattleConfig, BattleSetup, FieldSurface, UnitClass, UnitTemplate};

/// Chainable [`UnitTemplate`] builder starting from sensible mid-range
/// stats.
#[derive(Clone, Debug)]
pub struct TemplateBuilder(UnitTemplate);

impl TemplateBuilder {
    /// Sets the attack stat.
    #[must_use]
    pub fn atk(mut self, atk: f32) -> Self {
        self.0.atk = atk;
        self
    }

    /// Sets the defence stat.
    #[must_use]
    pub fn def(mut self, def: f32) -> Self {
        self.0.def = def;
        self
    }

    /// Sets the speed stat.
    #[must_use]
    pub fn spd(mut self, spd: f32) -> Self {
        self.0.spd = spd;
        self
    }

    /// Sets the range stat.
    #[must_use]
    pub fn rng(mut self, rng: f32) -> Self {
        self.0.rng = rng;
        self
    }

    /// Sets maximum hit points.
    #[must_use]
    pub fn hp(mut self, hp: f32) -> Self {
        self.0.hp = hp;
        self
    }

    /// Sets the display name.
    #[must_use]
    pub fn named(mut self, name: &str) -> Self {
        self.0.name = Some(name.to_owned());
        self
    }

    /// Finishes the template.
    #[must_use]
    pub fn build(self) -> UnitTemplate {
        self.0
    }
}

/// Starts a template of `class`.
///
/// # Examples
/// ```
/// use skirmish::UnitClass;
/// use test_utils::unit;
/// let template = unit(UnitClass::Heavy).atk(80.0).build();
/// assert_eq!(template.atk, 80.0);
/// assert_eq!(template.class, UnitClass::Heavy);
/// ```
#[must_use]
pub fn unit(class: UnitClass) -> TemplateBuilder {
    TemplateBuilder(UnitTemplate {
        name: None,
        class,
        atk: 50.0,
        def: 5.0,
        spd: 60.0,
        rng: 10.0,
        hp: 100.0,
    })
}

/// Config with short intro and outro so tests reach the interesting part
/// quickly.
#[must_use]
pub fn quick_config() -> BattleConfig {
    BattleConfig {
        intro_seconds: 0.1,
        outro_seconds: 0.1,
        ..BattleConfig::default()
    }
}

/// Seeded setup on a 600x800 field with a quick config.
#[must_use]
pub fn duel_setup(player: Vec<UnitTemplate>, enemy: Vec<UnitTemplate>) -> BattleSetup {
    let mut setup = BattleSetup::new(FieldSurface::new(600.0, 800.0), player, enemy);
    setup.seed = Some(42);
    setup.config = quick_config();
    setup
}
