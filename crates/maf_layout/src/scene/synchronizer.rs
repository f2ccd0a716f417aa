//! Key-based reconciliation of the live object set.
//!
//! The synchronizer owns every object currently in the scene, indexed by [`ObjectKey`].
//! Each [`SceneSynchronizer::reconcile`] call is one mark-and-sweep pass: objects whose key
//! the new result produces are marked with the pass number, new keys are instantiated, and
//! whatever was not marked is removed. Kept objects are never rebuilt.
use std::collections::HashMap;

use tracing::{debug, warn};

use super::key::ObjectKey;
use super::models::ModelRegistry;
use super::object::{SceneStyle, VisualObject};
use crate::grid::{CoordinateFrame, TileCoord};
use crate::paint::Brush;
use crate::service::CalculationResponse;

/// Outcome of one reconciliation pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneDiff {
    /// Objects instantiated in this pass, in result order.
    pub added: Vec<VisualObject>,
    /// Objects dropped in this pass, ordered by key.
    pub removed: Vec<VisualObject>,
    /// Number of live objects matched by key and left untouched.
    pub kept: usize,
    /// Equipment skipped because its model is empty or not registered: `(equipment key, model)`.
    pub unknown_equipment: Vec<(String, String)>,
}

impl SceneDiff {
    /// `true` when nothing was added or removed.
    pub fn is_unchanged(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

#[derive(Clone, Debug)]
struct LiveObject {
    object: VisualObject,
    seen: u64,
}

/// Arena of live [`VisualObject`]s.
#[derive(Clone, Debug, Default)]
pub struct SceneSynchronizer {
    live: HashMap<ObjectKey, LiveObject>,
    pass: u64,
    style: SceneStyle,
    models: ModelRegistry,
}

impl SceneSynchronizer {
    pub fn new(style: SceneStyle) -> Self {
        Self {
            style,
            ..Default::default()
        }
    }

    pub fn with_models(mut self, models: ModelRegistry) -> Self {
        self.models = models;
        self
    }

    pub fn style(&self) -> &SceneStyle {
        &self.style
    }

    pub fn models(&self) -> &ModelRegistry {
        &self.models
    }

    pub fn models_mut(&mut self) -> &mut ModelRegistry {
        &mut self.models
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn contains(&self, key: &ObjectKey) -> bool {
        self.live.contains_key(key)
    }

    pub fn get(&self, key: &ObjectKey) -> Option<&VisualObject> {
        self.live.get(key).map(|l| &l.object)
    }

    pub fn iter(&self) -> impl Iterator<Item = &VisualObject> {
        self.live.values().map(|l| &l.object)
    }

    /// Number of completed reconciliation passes.
    pub fn pass(&self) -> u64 {
        self.pass
    }

    /// Adds a marker over a painted tile. Returns the new object, or `None` if a marker with
    /// the same key is already live.
    ///
    /// Markers are not produced by calculation results, so the next pass removes them.
    pub fn insert_marker(
        &mut self,
        frame: &CoordinateFrame,
        brush: Brush,
        tile: TileCoord,
    ) -> Option<VisualObject> {
        let key = ObjectKey::marker(brush, tile);
        if self.live.contains_key(&key) {
            return None;
        }
        let object = VisualObject::marker(frame, &self.style, brush, tile);
        self.live.insert(
            key,
            LiveObject {
                object: object.clone(),
                seen: self.pass,
            },
        );
        Some(object)
    }

    /// Diffs the live set against `result` and applies the difference.
    pub fn reconcile(
        &mut self,
        frame: &CoordinateFrame,
        result: &CalculationResponse,
    ) -> SceneDiff {
        self.pass += 1;
        let pass = self.pass;
        let mut diff = SceneDiff::default();

        for slot in &result.slots {
            if let Some(item) = &slot.equipment {
                if let Some(entry) = self.models.get(&item.model) {
                    if let Some(object) = VisualObject::equipment(frame, slot, entry) {
                        self.touch_or_insert(object, pass, &mut diff);
                    }
                } else {
                    warn!(
                        "Equipment '{}' has no renderable model ('{}'); drawing its slot only.",
                        item.key, item.model
                    );
                    diff.unknown_equipment
                        .push((item.key.clone(), item.model.clone()));
                }
            }
            let placeholder = VisualObject::placeholder(frame, &self.style, slot);
            self.touch_or_insert(placeholder, pass, &mut diff);
        }

        let mut stale: Vec<ObjectKey> = self
            .live
            .iter()
            .filter(|(_, l)| l.seen < pass)
            .map(|(k, _)| k.clone())
            .collect();
        stale.sort();
        for key in stale {
            if let Some(l) = self.live.remove(&key) {
                diff.removed.push(l.object);
            }
        }

        debug!(
            "Reconcile pass {}: {} added, {} removed, {} kept, {} unknown equipment.",
            pass,
            diff.added.len(),
            diff.removed.len(),
            diff.kept,
            diff.unknown_equipment.len()
        );
        diff
    }

    fn touch_or_insert(&mut self, object: VisualObject, pass: u64, diff: &mut SceneDiff) {
        match self.live.get_mut(&object.key) {
            Some(live) => {
                // The same key may appear twice in one result; count it once.
                if live.seen != pass {
                    live.seen = pass;
                    diff.kept += 1;
                }
            }
            None => {
                self.live.insert(
                    object.key.clone(),
                    LiveObject {
                        object: object.clone(),
                        seen: pass,
                    },
                );
                diff.added.push(object);
            }
        }
    }

    /// Removes every live object, returning them ordered by key.
    pub fn clear(&mut self) -> Vec<VisualObject> {
        let mut removed: Vec<VisualObject> = self.live.drain().map(|(_, l)| l.object).collect();
        removed.sort_by(|a, b| a.key.cmp(&b.key));
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{GeoCoord, Zone};
    use crate::scene::models::ModelEntry;
    use crate::scene::object::VisualKind;
    use crate::service::{EquipmentItem, Slot};

    fn frame() -> CoordinateFrame {
        CoordinateFrame::new(GeoCoord::default(), 1.0)
    }

    fn swing() -> EquipmentItem {
        EquipmentItem {
            key: "swing-01".into(),
            model: "swing".into(),
            name: "Swing".into(),
            provider: "acme".into(),
            cost: 1200.0,
        }
    }

    fn sync() -> SceneSynchronizer {
        let mut models = ModelRegistry::new();
        models.register("swing", ModelEntry::new("swing.glb"));
        SceneSynchronizer::new(SceneStyle::default()).with_models(models)
    }

    fn result(slots: Vec<Slot>) -> CalculationResponse {
        CalculationResponse::new(slots)
    }

    #[test]
    fn first_pass_adds_everything() {
        let mut s = sync();
        let r = result(vec![
            Slot::new(TileCoord::new(0, 0), [2, 2], Zone::Sport).with_equipment(swing()),
            Slot::new(TileCoord::new(2, 0), [1, 1], Zone::Relax),
        ]);
        let diff = s.reconcile(&frame(), &r);
        assert_eq!(diff.added.len(), 3);
        assert!(diff.removed.is_empty());
        assert_eq!(s.len(), 3);
        assert_eq!(
            diff.added[0].kind,
            VisualKind::Equipment {
                model: "swing".into(),
                source: "swing.glb".into(),
                scale: 1.0,
            }
        );
    }

    #[test]
    fn reconcile_is_idempotent() {
        let mut s = sync();
        let r = result(vec![
            Slot::new(TileCoord::new(0, 0), [2, 2], Zone::Sport).with_equipment(swing()),
            Slot::new(TileCoord::new(3, 1), [2, 1], Zone::Child),
        ]);
        s.reconcile(&frame(), &r);
        let again = s.reconcile(&frame(), &r);
        assert!(again.is_unchanged());
        assert_eq!(again.kept, 3);
    }

    #[test]
    fn only_differences_are_applied() {
        let mut s = sync();
        let a = Slot::new(TileCoord::new(0, 0), [2, 2], Zone::Sport);
        let b = Slot::new(TileCoord::new(2, 0), [2, 2], Zone::Child);
        let c = Slot::new(TileCoord::new(4, 0), [1, 1], Zone::Relax);
        s.reconcile(&frame(), &result(vec![a.clone(), b.clone()]));
        let diff = s.reconcile(&frame(), &result(vec![b.clone(), c.clone()]));
        assert_eq!(diff.kept, 1);
        assert_eq!(
            diff.added.iter().map(|o| o.key.clone()).collect::<Vec<_>>(),
            vec![ObjectKey::placeholder(&c)]
        );
        assert_eq!(
            diff.removed.iter().map(|o| o.key.clone()).collect::<Vec<_>>(),
            vec![ObjectKey::placeholder(&a)]
        );
        assert!(s.contains(&ObjectKey::placeholder(&b)));
    }

    #[test]
    fn kept_objects_are_not_rebuilt() {
        let mut s = sync();
        let slot = Slot::new(TileCoord::new(1, 1), [1, 1], Zone::Sport).with_weight(0.2);
        let key = ObjectKey::placeholder(&slot);
        s.reconcile(&frame(), &result(vec![slot.clone()]));
        let before = s.get(&key).cloned();
        // Weight does not take part in the key, so the object survives untouched.
        let diff = s.reconcile(&frame(), &result(vec![slot.with_weight(0.9)]));
        assert!(diff.is_unchanged());
        assert_eq!(s.get(&key).cloned(), before);
    }

    #[test]
    fn unknown_equipment_keeps_placeholder() {
        let mut s = sync();
        let mut item = swing();
        item.model = "trampoline".into();
        let empty = EquipmentItem {
            key: "bench-02".into(),
            ..Default::default()
        };
        let r = result(vec![
            Slot::new(TileCoord::new(0, 0), [2, 2], Zone::Sport).with_equipment(item),
            Slot::new(TileCoord::new(2, 2), [1, 1], Zone::Relax).with_equipment(empty),
        ]);
        let diff = s.reconcile(&frame(), &r);
        assert_eq!(diff.added.len(), 2);
        assert!(diff
            .added
            .iter()
            .all(|o| o.kind == VisualKind::Placeholder));
        assert_eq!(
            diff.unknown_equipment,
            vec![
                ("swing-01".to_string(), "trampoline".to_string()),
                ("bench-02".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn markers_are_swept_by_the_next_pass() {
        let mut s = sync();
        let f = frame();
        assert!(s.insert_marker(&f, Brush::Sport, TileCoord::new(1, 1)).is_some());
        assert!(s.insert_marker(&f, Brush::Sport, TileCoord::new(1, 1)).is_none());
        assert_eq!(s.len(), 1);
        let diff = s.reconcile(&f, &result(vec![]));
        assert_eq!(diff.removed.len(), 1);
        assert!(s.is_empty());
    }

    #[test]
    fn duplicate_keys_in_one_result_count_once() {
        let mut s = sync();
        let slot = Slot::new(TileCoord::new(0, 0), [1, 1], Zone::Child);
        let diff = s.reconcile(&frame(), &result(vec![slot.clone(), slot.clone()]));
        assert_eq!(diff.added.len(), 1);
        assert_eq!(diff.kept, 0);
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn clear_removes_everything() {
        let mut s = sync();
        s.insert_marker(&frame(), Brush::Child, TileCoord::new(0, 0));
        s.reconcile(
            &frame(),
            &result(vec![Slot::new(TileCoord::new(0, 0), [1, 1], Zone::Child)]),
        );
        assert_eq!(s.clear().len(), 1);
        assert!(s.is_empty());
    }
}
