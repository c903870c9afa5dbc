//! Inline styles, stylesheet rules and style transitions
//!
//! Only the properties the page behaviors touch are modelled: opacity,
//! transform (translate-y + scale), transition, background, box-shadow and
//! outline. Colors may reference custom properties (`var(--accent-color)`)
//! that resolve against the stylesheet at compute time.

use super::selector::{Selector, SelectorError};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

// ─────────────────────────────────────────────────────────────────────────────
// Colors
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid color `{0}`")]
pub struct ColorError(pub String);

/// An sRGB color with alpha in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rgb`, `#rrggbb`, `rgb(r, g, b)` or `rgba(r, g, b, a)`
    pub fn parse(input: &str) -> Result<Self, ColorError> {
        let s = input.trim();
        let err = || ColorError(input.to_string());

        if let Some(hex) = s.strip_prefix('#') {
            if !hex.is_ascii() {
                return Err(err());
            }
            let expanded: String = match hex.len() {
                3 => hex.chars().flat_map(|c| [c, c]).collect(),
                6 => hex.to_string(),
                _ => return Err(err()),
            };
            let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).map_err(|_| err());
            return Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?));
        }

        let (body, has_alpha) = if let Some(rest) = s.strip_prefix("rgba(") {
            (rest, true)
        } else if let Some(rest) = s.strip_prefix("rgb(") {
            (rest, false)
        } else {
            return Err(err());
        };
        let body = body.strip_suffix(')').ok_or_else(err)?;
        let parts: Vec<&str> = body.split(',').map(str::trim).collect();
        let expected = if has_alpha { 4 } else { 3 };
        if parts.len() != expected {
            return Err(err());
        }
        let channel = |p: &str| p.parse::<u8>().map_err(|_| err());
        let a = if has_alpha {
            parts[3]
                .parse::<f32>()
                .map_err(|_| err())?
                .clamp(0.0, 1.0)
        } else {
            1.0
        };
        Ok(Self::rgba(
            channel(parts[0])?,
            channel(parts[1])?,
            channel(parts[2])?,
            a,
        ))
    }

    /// Composite this color over an opaque backdrop
    pub fn over(self, backdrop: Rgba) -> Rgba {
        let mix = |fg: u8, bg: u8| {
            (f32::from(fg) * self.a + f32::from(bg) * (1.0 - self.a)).round() as u8
        };
        Rgba::rgb(
            mix(self.r, backdrop.r),
            mix(self.g, backdrop.g),
            mix(self.b, backdrop.b),
        )
    }

    /// Fade toward a backdrop by `opacity` (1.0 = unchanged, 0.0 = backdrop)
    pub fn faded(self, opacity: f32, backdrop: Rgba) -> Rgba {
        Rgba {
            a: opacity.clamp(0.0, 1.0),
            ..self
        }
        .over(backdrop)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if (self.a - 1.0).abs() < f32::EPSILON {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }
}

/// A declared color: literal or a custom property reference
#[derive(Debug, Clone, PartialEq)]
pub enum ColorValue {
    Literal(Rgba),
    Var(String),
}

// ─────────────────────────────────────────────────────────────────────────────
// Transform / transition
// ─────────────────────────────────────────────────────────────────────────────

/// `translateY(..) scale(..)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translate_y: f32,
    pub scale: f32,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translate_y: 0.0,
        scale: 1.0,
    };

    pub const fn translate_y(px: f32) -> Self {
        Self {
            translate_y: px,
            scale: 1.0,
        }
    }

    pub const fn with_scale(self, scale: f32) -> Self {
        Self { scale, ..self }
    }

    fn lerp(from: Transform, to: Transform, t: f32) -> Transform {
        Transform {
            translate_y: lerp(from.translate_y, to.translate_y, t),
            scale: lerp(from.scale, to.scale, t),
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "translateY({}px)", self.translate_y)?;
        if (self.scale - 1.0).abs() > f32::EPSILON {
            write!(f, " scale({})", self.scale)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    #[default]
    Ease,
    EaseOut,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Ease => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let inv = -2.0 * t + 2.0;
                    1.0 - inv * inv * inv / 2.0
                }
            }
            Easing::EaseOut => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionProperty {
    Opacity,
    Transform,
    All,
}

impl TransitionProperty {
    fn covers(self, other: TransitionProperty) -> bool {
        self == TransitionProperty::All || self == other
    }
}

/// One entry of a `transition:` list
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub property: TransitionProperty,
    pub duration: Duration,
    pub easing: Easing,
}

impl Transition {
    pub fn new(property: TransitionProperty, duration: Duration) -> Self {
        Self {
            property,
            duration,
            easing: Easing::Ease,
        }
    }

    /// `opacity <d> ease, transform <d> ease`
    pub fn fade_and_move(duration: Duration) -> Vec<Transition> {
        vec![
            Self::new(TransitionProperty::Opacity, duration),
            Self::new(TransitionProperty::Transform, duration),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BoxShadow {
    None,
    Drop {
        offset_y: f32,
        blur: f32,
        color: ColorValue,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outline {
    None,
    Solid { width: f32, color: ColorValue },
}

// ─────────────────────────────────────────────────────────────────────────────
// Declarations
// ─────────────────────────────────────────────────────────────────────────────

/// A set of declared properties; unset fields fall through the cascade.
///
/// Used both for stylesheet rules and for an element's inline `style`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleDeclarations {
    pub opacity: Option<f32>,
    pub transform: Option<Transform>,
    pub transition: Option<Vec<Transition>>,
    pub background: Option<ColorValue>,
    pub box_shadow: Option<BoxShadow>,
    pub outline: Option<Outline>,
}

pub type InlineStyle = StyleDeclarations;

impl StyleDeclarations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opacity(mut self, value: f32) -> Self {
        self.opacity = Some(value);
        self
    }

    pub fn transform(mut self, value: Transform) -> Self {
        self.transform = Some(value);
        self
    }

    pub fn transition(mut self, value: Vec<Transition>) -> Self {
        self.transition = Some(value);
        self
    }

    pub fn background(mut self, value: ColorValue) -> Self {
        self.background = Some(value);
        self
    }

    pub fn box_shadow(mut self, value: BoxShadow) -> Self {
        self.box_shadow = Some(value);
        self
    }

    pub fn outline(mut self, value: Outline) -> Self {
        self.outline = Some(value);
        self
    }

    /// Overlay every set field of `other` onto `self`
    pub fn apply(&mut self, other: &StyleDeclarations) {
        if let Some(v) = other.opacity {
            self.opacity = Some(v);
        }
        if let Some(v) = other.transform {
            self.transform = Some(v);
        }
        if let Some(v) = &other.transition {
            self.transition = Some(v.clone());
        }
        if let Some(v) = &other.background {
            self.background = Some(v.clone());
        }
        if let Some(v) = &other.box_shadow {
            self.box_shadow = Some(v.clone());
        }
        if let Some(v) = &other.outline {
            self.outline = Some(v.clone());
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Stylesheet
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct StyleRule {
    pub selector: Selector,
    pub declarations: StyleDeclarations,
}

/// Ordered rule list plus custom properties declared on `:root`
#[derive(Debug, Clone, Default)]
pub struct Stylesheet {
    rules: Vec<StyleRule>,
    variables: HashMap<String, Rgba>,
}

impl Stylesheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_variable(&mut self, name: &str, value: Rgba) {
        self.variables.insert(name.to_string(), value);
    }

    pub fn variable(&self, name: &str) -> Option<Rgba> {
        self.variables.get(name).copied()
    }

    /// Append a rule; later rules win over earlier ones
    pub fn insert_rule(
        &mut self,
        selector: &str,
        declarations: StyleDeclarations,
    ) -> Result<(), SelectorError> {
        let selector = Selector::parse(selector)?;
        self.rules.push(StyleRule {
            selector,
            declarations,
        });
        Ok(())
    }

    pub fn rules(&self) -> &[StyleRule] {
        &self.rules
    }

    pub fn resolve(&self, color: &ColorValue) -> Option<Rgba> {
        match color {
            ColorValue::Literal(rgba) => Some(*rgba),
            ColorValue::Var(name) => self.variable(name),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Computed / displayed style
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedShadow {
    pub offset_y: f32,
    pub blur: f32,
    pub color: Rgba,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedOutline {
    pub width: f32,
    pub color: Rgba,
}

/// Cascade result with colors resolved
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedStyle {
    pub opacity: f32,
    pub transform: Transform,
    pub transition: Vec<Transition>,
    pub background: Option<Rgba>,
    pub box_shadow: Option<ResolvedShadow>,
    pub outline: Option<ResolvedOutline>,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            transform: Transform::IDENTITY,
            transition: Vec::new(),
            background: None,
            box_shadow: None,
            outline: None,
        }
    }
}

impl ComputedStyle {
    pub fn from_declarations(decl: &StyleDeclarations, sheet: &Stylesheet) -> Self {
        let defaults = Self::default();
        Self {
            opacity: decl.opacity.unwrap_or(defaults.opacity).clamp(0.0, 1.0),
            transform: decl.transform.unwrap_or(defaults.transform),
            transition: decl.transition.clone().unwrap_or_default(),
            background: decl.background.as_ref().and_then(|c| sheet.resolve(c)),
            box_shadow: match &decl.box_shadow {
                Some(BoxShadow::Drop {
                    offset_y,
                    blur,
                    color,
                }) => sheet.resolve(color).map(|color| ResolvedShadow {
                    offset_y: *offset_y,
                    blur: *blur,
                    color,
                }),
                _ => None,
            },
            outline: match &decl.outline {
                Some(Outline::Solid { width, color }) => {
                    sheet.resolve(color).map(|color| ResolvedOutline {
                        width: *width,
                        color,
                    })
                }
                _ => None,
            },
        }
    }

    fn transition_for(&self, property: TransitionProperty) -> Option<Transition> {
        self.transition
            .iter()
            .rev()
            .find(|t| t.property.covers(property) && !t.duration.is_zero())
            .copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Tween<T> {
    from: T,
    to: T,
    start: Duration,
    duration: Duration,
    easing: Easing,
}

impl<T: Copy> Tween<T> {
    fn progress(&self, now: Duration) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.start).as_secs_f32();
        self.easing
            .apply(elapsed / self.duration.as_secs_f32())
    }

    fn finished(&self, now: Duration) -> bool {
        now >= self.start + self.duration
    }
}

/// Committed style of one element plus its running transitions
#[derive(Debug, Clone, Default)]
pub struct StyleState {
    committed: ComputedStyle,
    opacity: Option<Tween<f32>>,
    transform: Option<Tween<Transform>>,
}

impl StyleState {
    pub fn committed(&self) -> &ComputedStyle {
        &self.committed
    }

    /// Opacity as it appears at `now`
    pub fn opacity_at(&self, now: Duration) -> f32 {
        match &self.opacity {
            Some(tween) => lerp(tween.from, tween.to, tween.progress(now)),
            None => self.committed.opacity,
        }
    }

    /// Transform as it appears at `now`
    pub fn transform_at(&self, now: Duration) -> Transform {
        match &self.transform {
            Some(tween) => Transform::lerp(tween.from, tween.to, tween.progress(now)),
            None => self.committed.transform,
        }
    }

    pub fn is_animating(&self, now: Duration) -> bool {
        self.opacity.is_some_and(|t| !t.finished(now))
            || self.transform.is_some_and(|t| !t.finished(now))
    }

    /// Replace the committed style, starting transitions where the new
    /// style's `transition` covers a changed property.
    ///
    /// Returns true if anything changed.
    pub fn commit(&mut self, next: ComputedStyle, now: Duration, first: bool) -> bool {
        if !first && next == self.committed {
            self.prune(now);
            return false;
        }

        if !first && (next.opacity - self.committed.opacity).abs() > f32::EPSILON {
            let from = self.opacity_at(now);
            self.opacity = next
                .transition_for(TransitionProperty::Opacity)
                .map(|t| Tween {
                    from,
                    to: next.opacity,
                    start: now,
                    duration: t.duration,
                    easing: t.easing,
                });
        }
        if !first && next.transform != self.committed.transform {
            let from = self.transform_at(now);
            self.transform = next
                .transition_for(TransitionProperty::Transform)
                .map(|t| Tween {
                    from,
                    to: next.transform,
                    start: now,
                    duration: t.duration,
                    easing: t.easing,
                });
        }

        self.committed = next;
        self.prune(now);
        true
    }

    fn prune(&mut self, now: Duration) {
        if self.opacity.is_some_and(|t| t.finished(now)) {
            self.opacity = None;
        }
        if self.transform.is_some_and(|t| t.finished(now)) {
            self.transform = None;
        }
    }
}

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_colors() {
        assert_eq!(Rgba::parse("#fff").unwrap(), Rgba::rgb(255, 255, 255));
        assert_eq!(Rgba::parse("#2563eb").unwrap(), Rgba::rgb(0x25, 0x63, 0xeb));
        assert_eq!(
            Rgba::parse("rgba(255, 255, 255, 0.95)").unwrap(),
            Rgba::rgba(255, 255, 255, 0.95)
        );
        assert!(Rgba::parse("rgba(1, 2, 3)").is_err());
        assert!(Rgba::parse("blue").is_err());
    }

    #[test]
    fn test_parse_rejects_multibyte_hex() {
        assert!(Rgba::parse("#€").is_err());
        assert!(Rgba::parse("#éé").is_err());
        assert!(Rgba::parse("#ff€").is_err());
    }

    #[test]
    fn test_over_blends_alpha() {
        let white_90 = Rgba::rgba(255, 255, 255, 0.9);
        let black = Rgba::rgb(0, 0, 0);
        assert_eq!(white_90.over(black), Rgba::rgb(230, 230, 230));
    }

    #[test]
    fn test_inline_overrides_rule() {
        let mut base = StyleDeclarations::new().opacity(0.0);
        base.apply(&StyleDeclarations::new().opacity(1.0));
        assert_eq!(base.opacity, Some(1.0));
    }

    #[test]
    fn test_transition_interpolates() {
        let sheet = Stylesheet::new();
        let mut state = StyleState::default();
        let hidden = StyleDeclarations::new()
            .opacity(0.0)
            .transition(Transition::fade_and_move(Duration::from_millis(600)));
        state.commit(
            ComputedStyle::from_declarations(&hidden, &sheet),
            Duration::ZERO,
            true,
        );
        assert_eq!(state.opacity_at(Duration::ZERO), 0.0);

        let shown = StyleDeclarations {
            opacity: Some(1.0),
            ..hidden.clone()
        };
        let start = Duration::from_millis(1000);
        assert!(state.commit(ComputedStyle::from_declarations(&shown, &sheet), start, false));

        let mid = state.opacity_at(start + Duration::from_millis(300));
        assert!(mid > 0.0 && mid < 1.0);
        assert!(state.is_animating(start + Duration::from_millis(300)));
        assert_eq!(state.opacity_at(start + Duration::from_millis(600)), 1.0);
        assert!(!state.is_animating(start + Duration::from_millis(600)));
    }

    #[test]
    fn test_change_without_transition_is_immediate() {
        let sheet = Stylesheet::new();
        let mut state = StyleState::default();
        state.commit(ComputedStyle::default(), Duration::ZERO, true);
        let next = ComputedStyle::from_declarations(
            &StyleDeclarations::new().transform(Transform::translate_y(30.0)),
            &sheet,
        );
        state.commit(next, Duration::from_millis(10), false);
        assert_eq!(
            state.transform_at(Duration::from_millis(10)),
            Transform::translate_y(30.0)
        );
    }
}
