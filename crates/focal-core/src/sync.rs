//! Indicator <-> field synchronization.
//!
//! [`Synchronizer`] is a sans-IO state machine: each named handler takes
//! one trigger (image ready, drag end, click, field change, double click)
//! plus the image's current [`Dimensions`] and returns the [`Effect`]s the
//! browser layer must apply, in order.
//!
//! Data flows one way per trigger:
//!
//! - field -> indicator on image ready and on every field change
//! - indicator -> field on drag end and click
//!
//! Every write to the field that actually changes its text re-runs the
//! change handler, exactly as a DOM `change` event would. The re-run finds
//! the value already normalized, writes nothing, and stops, so the two
//! directions can never feed each other indefinitely.

use crate::geometry;
use crate::preview::PreviewLink;
use crate::store::{self, CoordinateStore};
use crate::types::{Dimensions, FocalPoint, FocalPointId, PixelOffset};

/// A change the browser layer must make.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Move the indicator (CSS `left`/`top`) relative to the image.
    PlaceIndicator(PixelOffset),

    /// Write this text into the field.
    SetFieldValue(String),

    /// The field now holds this point; notify observers of the field
    /// (dispatch a `change` event).
    Changed(FocalPoint),

    /// Show or hide the field's form item.
    SetFieldVisible(bool),

    /// Point the preview link, and the request registered under
    /// `request_key`, at `href`.
    RetargetPreview {
        /// Registry key of the preview request.
        request_key: String,
        /// New link target.
        href: String,
    },
}

/// Whether the image has reported its dimensions yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Attached, waiting for the image to load. Field changes are
    /// recorded but the indicator is not placed.
    #[default]
    Pending,
    /// The image is loaded; the indicator follows the field.
    Ready,
}

/// Keeps one widget's indicator, field and preview link consistent.
#[derive(Debug, Clone)]
pub struct Synchronizer {
    id: FocalPointId,
    store: CoordinateStore,
    phase: Phase,
    field_visible: bool,
    indicator: Option<PixelOffset>,
    preview: Option<PreviewLink>,
}

impl Synchronizer {
    /// Attach to a widget whose field currently holds `field_value`.
    ///
    /// The raw field is hidden in favor of the indicator unless it carries
    /// a validation error, so the returned effects contain the initial
    /// [`Effect::SetFieldVisible`].
    #[must_use]
    pub fn attach(
        id: FocalPointId,
        field_value: Option<String>,
        has_error: bool,
        preview: Option<PreviewLink>,
    ) -> (Self, Vec<Effect>) {
        log::debug!("{id}: attached with value {field_value:?}");
        let synchronizer = Self {
            id,
            store: CoordinateStore::new(field_value),
            phase: Phase::Pending,
            field_visible: has_error,
            indicator: None,
            preview,
        };
        (synchronizer, vec![Effect::SetFieldVisible(has_error)])
    }

    /// The widget id.
    #[must_use]
    pub const fn id(&self) -> &FocalPointId {
        &self.id
    }

    /// The field text as last written or observed.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.store.raw()
    }

    /// The current focal point, clamped.
    #[must_use]
    pub fn point(&self) -> FocalPoint {
        self.store.point().clamped()
    }

    /// Whether the image has loaded.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the raw field is currently shown.
    #[must_use]
    pub const fn field_visible(&self) -> bool {
        self.field_visible
    }

    /// Where the indicator was last placed, if anywhere.
    #[must_use]
    pub const fn indicator(&self) -> Option<PixelOffset> {
        self.indicator
    }

    /// The preview link, if the widget has one.
    #[must_use]
    pub const fn preview(&self) -> Option<&PreviewLink> {
        self.preview.as_ref()
    }

    /// The image finished loading (or was already loaded at attach time).
    ///
    /// Places the indicator from the field value. A malformed or
    /// out-of-range value is rewritten to its normalized form.
    pub fn on_image_ready(&mut self, dimensions: Dimensions) -> Vec<Effect> {
        log::debug!("{}: image ready at {dimensions:?}", self.id);
        self.phase = Phase::Ready;
        let mut effects = Vec::new();
        self.place_indicator(dimensions, &mut effects);
        effects
    }

    /// The user released the indicator at `offset`.
    ///
    /// The offset is contained in the image before conversion.
    pub fn on_drag_end(&mut self, offset: PixelOffset, dimensions: Dimensions) -> Vec<Effect> {
        let offset = offset.contained(dimensions);
        self.indicator = Some(offset);
        let mut effects = Vec::new();
        self.commit(geometry::offset_to_point(offset, dimensions), dimensions, &mut effects);
        effects
    }

    /// The user clicked the image at (`offset_x`, `offset_y`) relative to
    /// its top-left corner.
    ///
    /// The offset is truncated to whole pixels and the indicator jumps
    /// there before the field is updated.
    pub fn on_image_click(
        &mut self,
        offset_x: f64,
        offset_y: f64,
        dimensions: Dimensions,
    ) -> Vec<Effect> {
        let offset = PixelOffset::new(offset_x.trunc(), offset_y.trunc());
        self.indicator = Some(offset);
        let mut effects = vec![Effect::PlaceIndicator(offset)];
        self.commit(geometry::offset_to_point(offset, dimensions), dimensions, &mut effects);
        effects
    }

    /// The field now holds `value` (typed by the user, or echoed back by a
    /// `change` event this widget dispatched).
    ///
    /// An echo of the value already stored is ignored.
    pub fn on_field_change(&mut self, value: Option<&str>, dimensions: Dimensions) -> Vec<Effect> {
        let mut effects = Vec::new();
        if !self.store.observe(value) {
            return effects;
        }
        self.field_changed(dimensions, &mut effects);
        effects
    }

    /// The user double-clicked the indicator: toggle the raw field.
    pub fn on_indicator_double_click(&mut self) -> Vec<Effect> {
        self.field_visible = !self.field_visible;
        vec![Effect::SetFieldVisible(self.field_visible)]
    }

    /// Dependents of the field value re-run.
    fn field_changed(&mut self, dimensions: Dimensions, effects: &mut Vec<Effect>) {
        if self.phase == Phase::Ready {
            self.place_indicator(dimensions, effects);
        }
        self.retarget_preview(effects);
    }

    fn place_indicator(&mut self, dimensions: Dimensions, effects: &mut Vec<Effect>) {
        let point = self.point();
        let offset = geometry::point_to_offset(point, dimensions);
        if self.indicator != Some(offset) {
            self.indicator = Some(offset);
            effects.push(Effect::PlaceIndicator(offset));
        }
        self.commit(point, dimensions, effects);
    }

    /// Write `point` to the field, notifying dependents only if the text
    /// changed.
    fn commit(&mut self, point: FocalPoint, dimensions: Dimensions, effects: &mut Vec<Effect>) {
        if !self.store.write(point) {
            return;
        }
        effects.push(Effect::SetFieldValue(store::format(point)));
        effects.push(Effect::Changed(point));
        self.field_changed(dimensions, effects);
    }

    fn retarget_preview(&mut self, effects: &mut Vec<Effect>) {
        let point = self.point();
        if let Some(preview) = self.preview.as_mut()
            && let Some(href) = preview.retarget(point)
        {
            effects.push(Effect::RetargetPreview {
                request_key: preview.request_key().to_owned(),
                href,
            });
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    const DIMS: Dimensions = Dimensions::new(200.0, 100.0);

    fn ready(value: Option<&str>) -> Synchronizer {
        let (mut sync, _) = Synchronizer::attach(
            FocalPointId::new("fp"),
            value.map(str::to_owned),
            false,
            None,
        );
        sync.on_image_ready(DIMS);
        sync
    }

    fn field_writes(effects: &[Effect]) -> Vec<&str> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::SetFieldValue(v) => Some(v.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn attach_hides_clean_field() {
        let (sync, effects) =
            Synchronizer::attach(FocalPointId::new("fp"), Some("30,70".into()), false, None);
        assert_eq!(effects, vec![Effect::SetFieldVisible(false)]);
        assert!(!sync.field_visible());
        assert_eq!(sync.phase(), Phase::Pending);
    }

    #[test]
    fn attach_keeps_erroneous_field_visible() {
        let (sync, effects) =
            Synchronizer::attach(FocalPointId::new("fp"), Some("abc".into()), true, None);
        assert_eq!(effects, vec![Effect::SetFieldVisible(true)]);
        assert!(sync.field_visible());
    }

    #[test]
    fn image_ready_places_indicator_from_field() {
        let (mut sync, _) =
            Synchronizer::attach(FocalPointId::new("fp"), Some("30,70".into()), false, None);
        let effects = sync.on_image_ready(DIMS);
        assert_eq!(
            effects,
            vec![Effect::PlaceIndicator(PixelOffset::new(0.30 * 200.0, 0.70 * 100.0))]
        );
        assert_eq!(sync.phase(), Phase::Ready);
    }

    #[test]
    fn image_ready_with_empty_field_writes_center() {
        let (mut sync, _) = Synchronizer::attach(FocalPointId::new("fp"), None, false, None);
        let effects = sync.on_image_ready(DIMS);
        assert_eq!(
            effects,
            vec![
                Effect::PlaceIndicator(PixelOffset::new(100.0, 50.0)),
                Effect::SetFieldValue("50,50".into()),
                Effect::Changed(FocalPoint::CENTER),
            ]
        );
    }

    #[test]
    fn drag_to_bottom_right_corner_is_full_percent() {
        let mut sync = ready(Some("50,50"));
        let effects = sync.on_drag_end(PixelOffset::new(200.0, 100.0), DIMS);
        assert_eq!(field_writes(&effects), vec!["100,100"]);
        assert_eq!(sync.value(), Some("100,100"));
    }

    #[test]
    fn drag_to_top_left_corner_is_zero() {
        let mut sync = ready(Some("50,50"));
        let effects = sync.on_drag_end(PixelOffset::ORIGIN, DIMS);
        assert_eq!(field_writes(&effects), vec!["0,0"]);
    }

    #[test]
    fn drag_outside_image_is_contained() {
        let mut sync = ready(Some("50,50"));
        let effects = sync.on_drag_end(PixelOffset::new(-40.0, 130.0), DIMS);
        assert_eq!(field_writes(&effects), vec!["0,100"]);
    }

    #[test]
    fn drag_end_snaps_indicator_to_stored_percent() {
        let mut sync = ready(Some("50,50"));
        let effects = sync.on_drag_end(PixelOffset::new(61.3, 20.2), DIMS);
        assert_eq!(
            effects,
            vec![
                Effect::SetFieldValue("31,20".into()),
                Effect::Changed(FocalPoint::new(31, 20)),
                Effect::PlaceIndicator(PixelOffset::new(
                    f64::from(31) / 100.0 * 200.0,
                    f64::from(20) / 100.0 * 100.0
                )),
            ]
        );
    }

    #[test]
    fn drag_end_without_change_writes_nothing() {
        let mut sync = ready(Some("50,50"));
        let effects = sync.on_drag_end(PixelOffset::new(100.4, 50.2), DIMS);
        assert!(effects.is_empty(), "unexpected effects {effects:?}");
    }

    #[test]
    fn click_moves_indicator_then_field() {
        let mut sync = ready(Some("50,50"));
        let effects = sync.on_image_click(40.9, 25.2, DIMS);
        assert_eq!(effects[0], Effect::PlaceIndicator(PixelOffset::new(40.0, 25.0)));
        assert_eq!(field_writes(&effects), vec!["20,25"]);
    }

    #[test]
    fn external_change_moves_indicator() {
        let mut sync = ready(Some("50,50"));
        let effects = sync.on_field_change(Some("30,70"), DIMS);
        assert_eq!(
            effects,
            vec![Effect::PlaceIndicator(PixelOffset::new(0.30 * 200.0, 0.70 * 100.0))]
        );
    }

    #[test]
    fn out_of_range_change_is_clamped_and_rewritten() {
        let mut sync = ready(Some("50,50"));
        let effects = sync.on_field_change(Some("150,-20"), DIMS);
        assert_eq!(
            effects,
            vec![
                Effect::PlaceIndicator(PixelOffset::new(200.0, 0.0)),
                Effect::SetFieldValue("100,0".into()),
                Effect::Changed(FocalPoint::new(100, 0)),
            ]
        );
        assert_eq!(sync.value(), Some("100,0"));
    }

    #[test]
    fn malformed_change_falls_back_to_center() {
        let mut sync = ready(Some("30,70"));
        let effects = sync.on_field_change(Some("not a point"), DIMS);
        assert_eq!(field_writes(&effects), vec!["50,50"]);
        assert_eq!(sync.point(), FocalPoint::CENTER);
    }

    #[test]
    fn echoed_change_is_ignored() {
        let mut sync = ready(Some("50,50"));
        let effects = sync.on_drag_end(PixelOffset::new(60.0, 70.0), DIMS);
        assert_eq!(field_writes(&effects), vec!["30,70"]);
        // The browser layer re-dispatches `change`; the echo must not loop.
        assert!(sync.on_field_change(Some("30,70"), DIMS).is_empty());
    }

    #[test]
    fn field_then_indicator_is_idempotent() {
        for x in (0..=100).step_by(5) {
            for y in (0..=100).step_by(5) {
                let mut sync = ready(Some("50,50"));
                let value = format!("{x},{y}");
                sync.on_field_change(Some(&value), DIMS);
                let Some(offset) = sync.indicator() else {
                    panic!("indicator not placed for {value}");
                };
                let effects = sync.on_drag_end(offset, DIMS);
                assert!(effects.is_empty(), "{value} drifted: {effects:?}");
                assert_eq!(sync.value(), Some(value.as_str()));
            }
        }
    }

    #[test]
    fn pending_widget_records_changes_without_placing() {
        let (mut sync, _) =
            Synchronizer::attach(FocalPointId::new("fp"), Some("50,50".into()), false, None);
        assert!(sync.on_field_change(Some("10,90"), DIMS).is_empty());
        assert_eq!(sync.indicator(), None);
        let effects = sync.on_image_ready(DIMS);
        assert_eq!(
            effects,
            vec![Effect::PlaceIndicator(PixelOffset::new(
                f64::from(10) / 100.0 * 200.0,
                f64::from(90) / 100.0 * 100.0
            ))]
        );
    }

    #[test]
    fn zero_dimensions_anchor_indicator_at_origin() {
        let (mut sync, _) =
            Synchronizer::attach(FocalPointId::new("fp"), Some("30,70".into()), false, None);
        let effects = sync.on_image_ready(Dimensions::ZERO);
        assert_eq!(effects, vec![Effect::PlaceIndicator(PixelOffset::ORIGIN)]);
    }

    #[test]
    fn double_click_toggles_field() {
        let mut sync = ready(Some("50,50"));
        assert_eq!(
            sync.on_indicator_double_click(),
            vec![Effect::SetFieldVisible(true)]
        );
        assert_eq!(
            sync.on_indicator_double_click(),
            vec![Effect::SetFieldVisible(false)]
        );
    }

    #[test]
    fn change_retargets_preview_link() {
        let preview = PreviewLink::new("/focal-point/preview/thumb/50%2C50", "fp-preview-link");
        let (mut sync, _) = Synchronizer::attach(
            FocalPointId::new("fp"),
            Some("50,50".into()),
            false,
            Some(preview),
        );
        sync.on_image_ready(DIMS);
        let effects = sync.on_field_change(Some("30,70"), DIMS);
        assert_eq!(
            effects.last(),
            Some(&Effect::RetargetPreview {
                request_key: "fp-preview-link".into(),
                href: "/focal-point/preview/thumb/30%2C70".into(),
            })
        );
        assert_eq!(
            sync.preview().map(PreviewLink::href),
            Some("/focal-point/preview/thumb/30%2C70")
        );
    }

    #[test]
    fn preview_uses_normalized_value_once() {
        let preview = PreviewLink::new("/preview/50%2C50", "fp-preview-link");
        let (mut sync, _) = Synchronizer::attach(
            FocalPointId::new("fp"),
            Some("50,50".into()),
            false,
            Some(preview),
        );
        sync.on_image_ready(DIMS);
        let effects = sync.on_field_change(Some("150,-20"), DIMS);
        let retargets: Vec<_> = effects
            .iter()
            .filter(|e| matches!(e, Effect::RetargetPreview { .. }))
            .collect();
        assert_eq!(
            retargets,
            vec![&Effect::RetargetPreview {
                request_key: "fp-preview-link".into(),
                href: "/preview/100%2C0".into(),
            }]
        );
    }
}
