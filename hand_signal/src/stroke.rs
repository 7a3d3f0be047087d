//! Stroke Gesture Recognizer: a simplified unistroke matcher.
//!
//! While the primary hand pinches, the interaction centre is appended to a
//! path every frame.  On release the path is:
//!
//! 1. resampled to [`RESAMPLE_POINTS`] points evenly spaced along its length,
//! 2. translated so its centroid is the origin,
//! 3. scaled uniformly into the unit box (larger side = 1),
//!
//! and compared index-by-index against every registered template.  There is
//! no rotation normalization: only upright strokes are recognized.
//!
//! Rejection (too few points, too small, nothing close enough) is a normal
//! outcome, not an error.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::feature::HandFeature;
use crate::point::Point2;

// ════════════════════════════════════════════════════════════════════════════
// Tunables
// ════════════════════════════════════════════════════════════════════════════

/// Points per resampled stroke and template.
pub const RESAMPLE_POINTS: usize = 32;
/// Strokes shorter than this (in captured frames) are discarded.
pub const MIN_STROKE_POINTS: usize = 10;
/// Larger bounding-box side below which a stroke is too small to classify.
pub const MIN_STROKE_SIZE: f32 = 0.05;
/// Mean point distance a match must stay under.
pub const MATCH_THRESHOLD: f32 = 0.25;

/// Recognizer thresholds.  Defaults are the constants above.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognizerConfig {
    pub resample_points: usize,
    pub min_points:      usize,
    pub min_size:        f32,
    pub match_threshold: f32,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        RecognizerConfig {
            resample_points: RESAMPLE_POINTS,
            min_points:      MIN_STROKE_POINTS,
            min_size:        MIN_STROKE_SIZE,
            match_threshold: MATCH_THRESHOLD,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Templates
// ════════════════════════════════════════════════════════════════════════════

/// A named stroke shape in the unit square, y-up, drawn in point order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GestureTemplate {
    pub name:   String,
    pub points: Vec<Point2>,
}

impl GestureTemplate {
    pub fn new(name: &str, points: Vec<Point2>) -> Self {
        GestureTemplate { name: name.to_string(), points }
    }

    /// "R": up the stem, round the bowl back to mid-height, then the leg.
    pub fn letter_r() -> Self {
        GestureTemplate::new("R", vec![
            Point2::new(0.0, 0.0),  Point2::new(0.0, 1.0),
            Point2::new(0.5, 1.0),  Point2::new(1.0, 0.75),
            Point2::new(0.5, 0.5),  Point2::new(0.0, 0.5),
            Point2::new(1.0, 0.0),
        ])
    }

    /// "O": a closed circle starting at the top, drawn counter-clockwise.
    pub fn circle() -> Self {
        const SEGMENTS: usize = 32;
        let points = (0..=SEGMENTS)
            .map(|i| {
                let a = std::f32::consts::FRAC_PI_2
                    + i as f32 / SEGMENTS as f32 * std::f32::consts::TAU;
                Point2::new(0.5 + 0.5 * a.cos(), 0.5 + 0.5 * a.sin())
            })
            .collect();
        GestureTemplate::new("O", points)
    }

    pub fn builtin() -> Vec<GestureTemplate> {
        vec![GestureTemplate::letter_r(), GestureTemplate::circle()]
    }
}

/// Why a template could not be registered.
#[derive(Clone, Debug, PartialEq)]
pub enum TemplateError {
    Empty { name: String },
    NonFinite { name: String },
    Degenerate { name: String, size: f32 },
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::Empty { name } =>
                write!(f, "gesture template \"{}\" has no points", name),
            TemplateError::NonFinite { name } =>
                write!(f, "gesture template \"{}\" has a non-finite coordinate", name),
            TemplateError::Degenerate { name, size } =>
                write!(f, "gesture template \"{}\" is degenerate (extent {:.4})", name, size),
        }
    }
}

impl std::error::Error for TemplateError {}

// ════════════════════════════════════════════════════════════════════════════
// Geometry
// ════════════════════════════════════════════════════════════════════════════

/// Total polyline length.
pub fn path_length(points: &[Point2]) -> f32 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Resample `points` to exactly `n` points spaced evenly along the polyline.
///
/// Interpolated points are spliced into a working copy so each following
/// segment starts from the last emitted point.  A zero-length path yields
/// `n` copies of its first point.
pub fn resample(points: &[Point2], n: usize) -> Vec<Point2> {
    let Some(&first) = points.first() else { return Vec::new() };
    if n < 2 {
        return vec![first; n];
    }
    let interval = path_length(points) / (n - 1) as f32;
    if !(interval > f32::EPSILON) {
        return vec![first; n];
    }

    let mut work = points.to_vec();
    let mut out = Vec::with_capacity(n);
    out.push(first);

    let mut walked = 0.0_f32;
    let mut i = 1;
    while i < work.len() && out.len() < n {
        let (prev, cur) = (work[i - 1], work[i]);
        let d = prev.distance(cur);
        if d > 0.0 && walked + d >= interval {
            let q = prev.lerp(cur, (interval - walked) / d);
            out.push(q);
            work.insert(i, q);
            walked = 0.0;
        } else {
            walked += d;
        }
        i += 1;
    }

    // Rounding can leave us one short of the final vertex.
    let last = work[work.len() - 1];
    while out.len() < n {
        out.push(last);
    }
    out
}

pub fn centroid(points: &[Point2]) -> Point2 {
    if points.is_empty() {
        return Point2::ZERO;
    }
    let sum = points.iter().fold(Point2::ZERO, |acc, &p| acc + p);
    sum * (1.0 / points.len() as f32)
}

/// `(min, max)` corners of the axis-aligned bounding box.
fn bounds(points: &[Point2]) -> (Point2, Point2) {
    points.iter().fold(
        (Point2::new(f32::INFINITY, f32::INFINITY), Point2::new(f32::NEG_INFINITY, f32::NEG_INFINITY)),
        |(lo, hi), p| (
            Point2::new(lo.x.min(p.x), lo.y.min(p.y)),
            Point2::new(hi.x.max(p.x), hi.y.max(p.y)),
        ),
    )
}

/// Larger side of the bounding box.
pub fn extent(points: &[Point2]) -> f32 {
    if points.is_empty() {
        return 0.0;
    }
    let (lo, hi) = bounds(points);
    (hi.x - lo.x).max(hi.y - lo.y)
}

/// Centre on the centroid, then scale uniformly into the unit box.
/// Returns `None` when the larger side is below `min_size`.
pub fn normalize(points: &[Point2], min_size: f32) -> Option<Vec<Point2>> {
    let c = centroid(points);
    let centred: Vec<Point2> = points.iter().map(|&p| p - c).collect();
    let size = extent(&centred);
    if !(size >= min_size) || size <= 0.0 {
        return None;
    }
    let (lo, _) = bounds(&centred);
    Some(centred.iter().map(|&p| (p - lo) * (1.0 / size)).collect())
}

/// Mean index-aligned distance between two equally long sequences.
pub fn mean_distance(a: &[Point2], b: &[Point2]) -> f32 {
    let n = a.len().min(b.len());
    if n == 0 {
        return f32::INFINITY;
    }
    let total: f32 = a.iter().zip(b).map(|(p, q)| p.distance(*q)).sum();
    total / n as f32
}

// ════════════════════════════════════════════════════════════════════════════
// StrokeRecognizer
// ════════════════════════════════════════════════════════════════════════════

/// The accepted template and its mean distance.
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeMatch {
    pub name:     String,
    pub distance: f32,
}

/// Why a stroke produced no gesture.
#[derive(Clone, Debug, PartialEq)]
pub enum Rejection {
    TooFewPoints { got: usize, needed: usize },
    TooSmall { size: f32 },
    NoTemplates,
    /// Closest template was still over the threshold.
    NoMatch { best: String, distance: f32 },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::TooFewPoints { got, needed } =>
                write!(f, "stroke too short ({} < {} points)", got, needed),
            Rejection::TooSmall { size } =>
                write!(f, "stroke too small (extent {:.4})", size),
            Rejection::NoTemplates => write!(f, "no templates registered"),
            Rejection::NoMatch { best, distance } =>
                write!(f, "closest template \"{}\" at {:.3}", best, distance),
        }
    }
}

#[derive(Clone, Debug)]
struct PreparedTemplate {
    name:   String,
    points: Vec<Point2>,
}

/// Template table plus thresholds.  Templates are resampled and normalized
/// once, at registration.
#[derive(Clone, Debug)]
pub struct StrokeRecognizer {
    config:    RecognizerConfig,
    templates: Vec<PreparedTemplate>,
}

impl Default for StrokeRecognizer {
    fn default() -> Self { StrokeRecognizer::new() }
}

impl StrokeRecognizer {
    /// Default thresholds with the built-in templates.
    pub fn new() -> Self {
        StrokeRecognizer::with_config(RecognizerConfig::default())
    }

    /// Built-in templates under custom thresholds.  A built-in that the
    /// thresholds reject (e.g. `min_size` at or above the unit box) is
    /// left out and logged; check [`missing_builtins`](Self::missing_builtins).
    pub fn with_config(config: RecognizerConfig) -> Self {
        let mut r = StrokeRecognizer::empty(config);
        for t in GestureTemplate::builtin() {
            let name = t.name.clone();
            if let Err(e) = r.register(t) {
                log::warn!("built-in template \"{}\" rejected: {}", name, e);
            }
        }
        r
    }

    /// Names of built-in templates not currently registered.
    pub fn missing_builtins(&self) -> Vec<String> {
        GestureTemplate::builtin()
            .into_iter()
            .map(|t| t.name)
            .filter(|n| !self.template_names().any(|have| have == n))
            .collect()
    }

    /// No templates at all.
    pub fn empty(config: RecognizerConfig) -> Self {
        StrokeRecognizer { config, templates: Vec::new() }
    }

    pub fn config(&self) -> &RecognizerConfig { &self.config }

    /// Add a template, or replace one with the same name in place (keeping
    /// its position in iteration order).
    pub fn register(&mut self, template: GestureTemplate) -> Result<(), TemplateError> {
        let GestureTemplate { name, points } = template;
        if points.is_empty() {
            return Err(TemplateError::Empty { name });
        }
        if !points.iter().all(|p| p.is_finite()) {
            return Err(TemplateError::NonFinite { name });
        }
        let sampled = resample(&points, self.config.resample_points);
        let prepared = match normalize(&sampled, self.config.min_size) {
            Some(p) => p,
            None => return Err(TemplateError::Degenerate { name, size: extent(&sampled) }),
        };

        match self.templates.iter_mut().find(|t| t.name == name) {
            Some(existing) => existing.points = prepared,
            None => self.templates.push(PreparedTemplate { name, points: prepared }),
        }
        Ok(())
    }

    pub fn template_names(&self) -> impl Iterator<Item = &str> {
        self.templates.iter().map(|t| t.name.as_str())
    }

    /// Classify a captured path.  Ties go to the first-registered template.
    pub fn classify(&self, path: &[Point2]) -> Result<StrokeMatch, Rejection> {
        let result = self.classify_inner(path);
        match &result {
            Ok(m)  => log::debug!("stroke recognized as \"{}\" (distance {:.3})", m.name, m.distance),
            Err(r) => log::debug!("stroke rejected: {}", r),
        }
        result
    }

    fn classify_inner(&self, path: &[Point2]) -> Result<StrokeMatch, Rejection> {
        let needed = self.config.min_points;
        if path.len() < needed {
            return Err(Rejection::TooFewPoints { got: path.len(), needed });
        }

        let sampled = resample(path, self.config.resample_points);
        let normalized = normalize(&sampled, self.config.min_size)
            .ok_or_else(|| Rejection::TooSmall { size: extent(&sampled) })?;

        let mut best: Option<(&PreparedTemplate, f32)> = None;
        for t in &self.templates {
            let d = mean_distance(&normalized, &t.points);
            if best.map_or(true, |(_, bd)| d < bd) {
                best = Some((t, d));
            }
        }

        let (t, distance) = best.ok_or(Rejection::NoTemplates)?;
        if distance < self.config.match_threshold {
            Ok(StrokeMatch { name: t.name.clone(), distance })
        } else {
            Err(Rejection::NoMatch { best: t.name.clone(), distance })
        }
    }

    /// Recognized template name, or `None` for any rejection.
    pub fn recognize(&self, path: &[Point2]) -> Option<StrokeMatch> {
        self.classify(path).ok()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// StrokeTracker: pinch-drag capture
// ════════════════════════════════════════════════════════════════════════════

/// Owns the open stroke path between pinch and release.
#[derive(Clone, Debug, Default)]
pub struct StrokeTracker {
    path:      Vec<Point2>,
    recording: bool,
}

impl StrokeTracker {
    pub fn new() -> Self { StrokeTracker::default() }

    pub fn is_recording(&self) -> bool { self.recording }

    pub fn path(&self) -> &[Point2] { &self.path }

    pub fn reset(&mut self) {
        self.recording = false;
        self.path.clear();
    }

    /// Feed one frame.  Returns a match on the frame the primary hand
    /// releases its pinch, if the captured stroke is recognized.
    pub fn update(
        &mut self,
        hands: &[HandFeature],
        center: Point2,
        recognizer: &StrokeRecognizer,
    ) -> Option<StrokeMatch> {
        let Some(primary) = hands.first() else {
            self.reset();
            return None;
        };

        if primary.is_pinch {
            self.path.push(center);
            self.recording = true;
            return None;
        }

        if !self.recording {
            return None;
        }
        self.recording = false;
        let path = std::mem::take(&mut self.path);
        recognizer.recognize(&path)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Walk a polyline, emitting `per_segment` evenly spaced points along
    /// each segment plus the final vertex.
    pub(crate) fn trace(vertices: &[Point2], per_segment: usize) -> Vec<Point2> {
        let mut out = Vec::new();
        for w in vertices.windows(2) {
            for k in 0..per_segment {
                out.push(w[0].lerp(w[1], k as f32 / per_segment as f32));
            }
        }
        if let Some(&last) = vertices.last() {
            out.push(last);
        }
        out
    }

    fn transform(points: &[Point2], scale: f32, offset: Point2) -> Vec<Point2> {
        points.iter().map(|&p| p * scale + offset).collect()
    }

    fn r_stroke() -> Vec<Point2> {
        // 6 segments × 7 + 1 = 43 captured points.
        trace(&GestureTemplate::letter_r().points, 7)
    }

    // ── resample ─────────────────────────────────────────────────────────

    #[test]
    fn resample_yields_exactly_n() {
        let stroke = r_stroke();
        for n in [2, 8, 32, 64, 100] {
            assert_eq!(resample(&stroke, n).len(), n);
        }
    }

    #[test]
    fn resample_preserves_length_of_straight_path() {
        // Uneven vertex spacing along a straight line.
        let line: Vec<Point2> = [0.0, 0.05, 0.3, 0.31, 0.7, 1.6, 2.0]
            .iter().map(|&t| Point2::new(t, t * 0.5)).collect();
        let original = path_length(&line);
        let r = resample(&line, 32);
        let interval = original / 31.0;
        assert!((path_length(&r) - 31.0 * interval).abs() < 1e-3 * original);
        for w in r.windows(2) {
            assert!((w[0].distance(w[1]) - interval).abs() < 1e-3);
        }
    }

    #[test]
    fn resample_keeps_endpoints() {
        let stroke = r_stroke();
        let r = resample(&stroke, 32);
        assert_eq!(r[0], stroke[0]);
        assert!(r[31].distance(*stroke.last().unwrap()) < 1e-3);
    }

    #[test]
    fn resample_zero_length_path() {
        let dot = vec![Point2::new(0.2, 0.2); 12];
        let r = resample(&dot, 32);
        assert_eq!(r.len(), 32);
        assert!(r.iter().all(|&p| p == Point2::new(0.2, 0.2)));
    }

    #[test]
    fn resample_does_not_touch_input() {
        let stroke = r_stroke();
        let copy = stroke.clone();
        let _ = resample(&stroke, 32);
        assert_eq!(stroke, copy);
    }

    // ── normalize ────────────────────────────────────────────────────────

    #[test]
    fn normalize_fits_unit_box() {
        let pts = transform(&r_stroke(), 0.4, Point2::new(-0.3, 0.2));
        let n = normalize(&pts, MIN_STROKE_SIZE).unwrap();
        assert!((extent(&n) - 1.0).abs() < 1e-5);
        assert!(n.iter().all(|p| p.x >= -1e-5 && p.y >= -1e-5 && p.x <= 1.0 + 1e-5 && p.y <= 1.0 + 1e-5));
    }

    #[test]
    fn normalize_rejects_tiny() {
        let pts = transform(&r_stroke(), 0.01, Point2::ZERO);
        assert!(normalize(&pts, MIN_STROKE_SIZE).is_none());
    }

    // ── recognizer ───────────────────────────────────────────────────────

    #[test]
    fn r_stroke_matches_r() {
        let rec = StrokeRecognizer::new();
        let stroke = transform(&r_stroke(), 0.6, Point2::new(-0.2, -0.3));
        let m = rec.classify(&stroke).unwrap();
        assert_eq!(m.name, "R");
        assert!(m.distance < MATCH_THRESHOLD);
    }

    #[test]
    fn r_stroke_rejected_by_circle() {
        let mut rec = StrokeRecognizer::empty(RecognizerConfig::default());
        rec.register(GestureTemplate::circle()).unwrap();
        match rec.classify(&r_stroke()) {
            Err(Rejection::NoMatch { best, distance }) => {
                assert_eq!(best, "O");
                assert!(distance > MATCH_THRESHOLD);
            }
            other => panic!("expected NoMatch, got {:?}", other),
        }
    }

    #[test]
    fn circle_stroke_matches_o() {
        let rec = StrokeRecognizer::new();
        let stroke = transform(&trace(&GestureTemplate::circle().points, 2), 0.5, Point2::new(0.1, 0.1));
        assert_eq!(rec.recognize(&stroke).map(|m| m.name), Some("O".to_string()));
    }

    #[test]
    fn recognition_is_translation_and_scale_invariant() {
        let rec = StrokeRecognizer::new();
        let base = r_stroke();
        let line = trace(&[Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)], 20);
        for &scale in &[0.2_f32, 0.5, 1.0, 2.5, 5.0] {
            for &offset in &[Point2::new(0.0, 0.0), Point2::new(-0.8, 0.6), Point2::new(2.0, -3.0)] {
                let got = rec.recognize(&transform(&base, scale, offset)).map(|m| m.name);
                assert_eq!(got.as_deref(), Some("R"), "scale {} offset {:?}", scale, offset);
                let rejected = rec.recognize(&transform(&line, scale, offset));
                assert!(rejected.is_none(), "line matched at scale {}", scale);
            }
        }
    }

    #[test]
    fn too_few_points() {
        let rec = StrokeRecognizer::new();
        let short: Vec<Point2> = r_stroke().into_iter().step_by(5).take(9).collect();
        assert_eq!(
            rec.classify(&short),
            Err(Rejection::TooFewPoints { got: 9, needed: MIN_STROKE_POINTS })
        );
    }

    #[test]
    fn too_small() {
        let rec = StrokeRecognizer::new();
        let tiny = transform(&r_stroke(), 0.02, Point2::new(0.5, 0.5));
        assert!(matches!(rec.classify(&tiny), Err(Rejection::TooSmall { .. })));
    }

    #[test]
    fn no_templates() {
        let rec = StrokeRecognizer::empty(RecognizerConfig::default());
        assert_eq!(rec.classify(&r_stroke()), Err(Rejection::NoTemplates));
    }

    #[test]
    fn ties_go_to_first_registered() {
        let mut rec = StrokeRecognizer::empty(RecognizerConfig::default());
        let mut twin = GestureTemplate::letter_r();
        twin.name = "R2".to_string();
        rec.register(GestureTemplate::letter_r()).unwrap();
        rec.register(twin).unwrap();
        assert_eq!(rec.recognize(&r_stroke()).unwrap().name, "R");
    }

    #[test]
    fn register_replaces_in_place() {
        let mut rec = StrokeRecognizer::new();
        rec.register(GestureTemplate::new("R", GestureTemplate::circle().points)).unwrap();
        let names: Vec<&str> = rec.template_names().collect();
        assert_eq!(names, ["R", "O"]);
    }

    #[test]
    fn register_rejects_bad_templates() {
        let mut rec = StrokeRecognizer::new();
        assert!(matches!(
            rec.register(GestureTemplate::new("empty", vec![])),
            Err(TemplateError::Empty { .. })
        ));
        assert!(matches!(
            rec.register(GestureTemplate::new("dot", vec![Point2::new(0.5, 0.5); 4])),
            Err(TemplateError::Degenerate { .. })
        ));
        assert!(matches!(
            rec.register(GestureTemplate::new("nan", vec![Point2::new(f32::NAN, 0.0), Point2::new(1.0, 1.0)])),
            Err(TemplateError::NonFinite { .. })
        ));
    }

    #[test]
    fn oversized_min_size_drops_builtins_without_panicking() {
        let rec = StrokeRecognizer::with_config(RecognizerConfig {
            min_size: 5.0,
            ..RecognizerConfig::default()
        });
        assert_eq!(rec.template_names().count(), 0);
        assert_eq!(rec.missing_builtins(), ["R", "O"]);
        assert!(matches!(rec.classify(&r_stroke()), Err(Rejection::TooSmall { .. })));
    }

    #[test]
    fn default_thresholds_keep_every_builtin() {
        assert!(StrokeRecognizer::new().missing_builtins().is_empty());
        let loose = StrokeRecognizer::with_config(RecognizerConfig {
            min_size: 0.9,
            ..RecognizerConfig::default()
        });
        assert!(loose.missing_builtins().is_empty());
    }

    // ── tracker ──────────────────────────────────────────────────────────

    fn pinching(p: bool) -> HandFeature {
        HandFeature { is_pinch: p, ..HandFeature::default() }
    }

    #[test]
    fn tracker_recognizes_on_release() {
        let rec = StrokeRecognizer::new();
        let mut tracker = StrokeTracker::new();
        for &p in &r_stroke() {
            assert!(tracker.update(&[pinching(true)], p, &rec).is_none());
        }
        assert!(tracker.is_recording());
        let m = tracker.update(&[pinching(false)], Point2::ZERO, &rec);
        assert_eq!(m.map(|m| m.name), Some("R".to_string()));
        assert!(!tracker.is_recording());
        assert!(tracker.path().is_empty());
    }

    #[test]
    fn tracker_discards_short_strokes() {
        let rec = StrokeRecognizer::new();
        let mut tracker = StrokeTracker::new();
        for &p in r_stroke().iter().take(5) {
            tracker.update(&[pinching(true)], p, &rec);
        }
        assert!(tracker.update(&[pinching(false)], Point2::ZERO, &rec).is_none());
        assert!(tracker.path().is_empty());
    }

    #[test]
    fn tracker_clears_when_hands_vanish() {
        let rec = StrokeRecognizer::new();
        let mut tracker = StrokeTracker::new();
        for &p in &r_stroke() {
            tracker.update(&[pinching(true)], p, &rec);
        }
        assert!(tracker.update(&[], Point2::ZERO, &rec).is_none());
        assert!(!tracker.is_recording());
        // Release after the reset has nothing to recognize.
        assert!(tracker.update(&[pinching(false)], Point2::ZERO, &rec).is_none());
    }
}
