//! The build project: inputs of a cross-section and the values derived from them.
use crate::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Owns the inputs of a cross-section and keeps the derived values current.
///
/// Every mutator bumps the version of the input it touches in the project's
/// [`DependencyGraph`]; derived values are recomputed lazily, only when one of the inputs they
/// depend on has changed.
///
/// # Example
/// ```rust
/// # use geosection::*;
/// let data = |alt| vec![GeophysicalData::new(alt, 0.0, 100.0, 1.0).unwrap()];
/// let wells = vec![
///     Well::new("A", 10.0, [0.0, 0.0], 100.0, data(10.0), true).unwrap(),
///     Well::new("B", 12.0, [50.0, 0.0], 100.0, data(12.0), true).unwrap(),
/// ];
/// let breaks = vec![Break::new("P1", [("A", 50.0), ("B", 55.0)], &wells).unwrap()];
/// let settings = BuildSettings { top: 0.0, bottom: -100.0, ..Default::default() };
///
/// let mut project = BuildProject::new(wells, breaks, settings).unwrap();
/// assert_eq!(project.section_path().unwrap().length(), 50.0);
///
/// project.set_well_enabled("B", false);
/// assert!(project.section_path().is_none());
/// assert!(!project.can_build());
/// ```
#[derive(Debug)]
pub struct BuildProject {
    wells: Vec<Well>,
    breaks: Vec<Break>,
    settings: BuildSettings,
    decoration_columns: Vec<DecorationColumn>,
    structural_maps: Vec<StructuralMap>,
    formations: Vec<OilBearingFormation>,
    well_labels: Vec<WellLabel>,

    graph: DependencyGraph,
    memo: Memos,
    building: AtomicBool,
}

#[derive(Debug, Default)]
struct Memos {
    active_wells: Memo<Arc<Vec<usize>>>,
    section_path: Memo<Option<Arc<SectionPath>>>,
    main_area_width: Memo<f64>,
    main_area_height: Memo<f64>,
    section_width: Memo<f64>,
    section_height: Memo<f64>,
    horizontal_points_count: Memo<u32>,
    vertical_points_count: Memo<u32>,
    break_infos: Memo<Arc<Vec<BreakInfo>>>,
    validation: Memo<Validation>,
}

impl BuildProject {
    /// Create a project.
    ///
    /// Fails if there are fewer than two wells, a well or break name is repeated, or a break
    /// has no depth for one of the wells.
    pub fn new(wells: Vec<Well>, breaks: Vec<Break>, settings: BuildSettings) -> Result<Self> {
        if wells.len() < 2 {
            return Err(Error::TooFewWells(wells.len()));
        }

        for (i, w) in wells.iter().enumerate() {
            if wells[..i].iter().any(|x| x.name() == w.name()) {
                return Err(Error::DuplicateWell(w.name().to_string()));
            }
        }

        for (i, b) in breaks.iter().enumerate() {
            if breaks[..i].iter().any(|x| x.name() == b.name()) {
                return Err(Error::DuplicateBreak(b.name().to_string()));
            }
            if let Some(w) = wells.iter().find(|w| !b.has_well(w.name())) {
                return Err(Error::MissingBreakDepth {
                    break_name: b.name().to_string(),
                    well: w.name().to_string(),
                });
            }
        }

        log::debug!(
            "project created with {} wells and {} breaks",
            wells.len(),
            breaks.len()
        );

        Ok(Self {
            wells,
            breaks,
            settings,
            decoration_columns: Vec::new(),
            structural_maps: Vec::new(),
            formations: Vec::new(),
            well_labels: Vec::new(),
            graph: DependencyGraph::new(),
            memo: Memos::default(),
            building: AtomicBool::new(false),
        })
    }

    pub fn with_decoration_columns(mut self, columns: Vec<DecorationColumn>) -> Self {
        self.decoration_columns = columns;
        self.graph.touch(Node::DecorationColumns);
        self
    }

    pub fn with_structural_maps(mut self, maps: Vec<StructuralMap>) -> Self {
        for m in maps {
            self.add_structural_map(m);
        }
        self
    }

    pub fn with_oil_bearing_formations(mut self, formations: Vec<OilBearingFormation>) -> Self {
        self.formations = formations;
        self.graph.touch(Node::Formations);
        self
    }

    pub fn with_well_labels(mut self, labels: Vec<WellLabel>) -> Self {
        self.well_labels = labels;
        self.graph.touch(Node::WellLabels);
        self
    }

    // ###### INPUTS ##########################################################

    pub fn wells(&self) -> &[Well] {
        &self.wells
    }

    pub fn breaks(&self) -> &[Break] {
        &self.breaks
    }

    pub fn settings(&self) -> &BuildSettings {
        &self.settings
    }

    pub fn decoration_columns(&self) -> &[DecorationColumn] {
        &self.decoration_columns
    }

    pub fn structural_maps(&self) -> &[StructuralMap] {
        &self.structural_maps
    }

    pub fn oil_bearing_formations(&self) -> &[OilBearingFormation] {
        &self.formations
    }

    pub fn well_labels(&self) -> &[WellLabel] {
        &self.well_labels
    }

    /// The project's version counters.
    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    // ###### MUTATORS ########################################################

    /// Enable or disable a well. Returns `false` if no well has the name.
    pub fn set_well_enabled(&mut self, name: &str, enabled: bool) -> bool {
        match self.wells.iter_mut().find(|w| w.name() == name) {
            Some(w) => {
                if w.is_enabled() != enabled {
                    w.set_enabled(enabled);
                    self.graph.touch(Node::Wells);
                }
                true
            }
            None => false,
        }
    }

    /// Change the settings through `f`.
    pub fn update_settings<F: FnOnce(&mut BuildSettings)>(&mut self, f: F) {
        let before = self.settings.clone();
        f(&mut self.settings);
        if self.settings != before {
            self.graph.touch(Node::Settings);
        }
    }

    /// Add a structural map, replacing one of the same name.
    pub fn add_structural_map(&mut self, map: StructuralMap) {
        match self
            .structural_maps
            .iter_mut()
            .find(|m| m.name() == map.name())
        {
            Some(m) => *m = map,
            None => self.structural_maps.push(map),
        }
        self.graph.touch(Node::StructuralMaps);
    }

    pub fn remove_structural_map(&mut self, name: &str) -> Option<StructuralMap> {
        let i = self.structural_maps.iter().position(|m| m.name() == name)?;
        self.graph.touch(Node::StructuralMaps);
        Some(self.structural_maps.remove(i))
    }

    pub fn add_oil_bearing_formation(&mut self, formation: OilBearingFormation) {
        self.formations.push(formation);
        self.graph.touch(Node::Formations);
    }

    pub fn remove_oil_bearing_formation(&mut self, index: usize) -> Option<OilBearingFormation> {
        if index >= self.formations.len() {
            return None;
        }
        self.graph.touch(Node::Formations);
        Some(self.formations.remove(index))
    }

    pub fn add_well_label(&mut self, label: WellLabel) {
        self.well_labels.push(label);
        self.graph.touch(Node::WellLabels);
    }

    pub fn remove_well_label(&mut self, index: usize) -> Option<WellLabel> {
        if index >= self.well_labels.len() {
            return None;
        }
        self.graph.touch(Node::WellLabels);
        Some(self.well_labels.remove(index))
    }

    /// Change the side(s) a decoration column is drawn on. Returns `false` if the index is out of
    /// bounds.
    pub fn set_decoration_column_mode(&mut self, index: usize, mode: DecorationColumnMode) -> bool {
        match self.decoration_columns.get_mut(index) {
            Some(c) => {
                if c.mode != mode {
                    c.mode = mode;
                    self.graph.touch(Node::DecorationColumns);
                }
                true
            }
            None => false,
        }
    }

    // ###### DERIVED #########################################################

    /// The enabled wells, in input order.
    pub fn active_wells(&self) -> Vec<&Well> {
        let idx = self
            .memo
            .active_wells
            .get_or_update(self.graph.stamp(Node::ActiveWells), || {
                Arc::new(
                    self.wells
                        .iter()
                        .enumerate()
                        .filter(|(_, w)| w.is_enabled())
                        .map(|(i, _)| i)
                        .collect(),
                )
            });
        idx.iter().map(|i| &self.wells[*i]).collect()
    }

    /// The section path through the active wells; `None` with fewer than two active wells.
    pub fn section_path(&self) -> Option<Arc<SectionPath>> {
        self.memo
            .section_path
            .get_or_update(self.graph.stamp(Node::SectionPath), || {
                let path = build_section_path(
                    &self.active_wells(),
                    self.settings.unscaled_offset(),
                );
                match &path {
                    Some(p) => log::debug!(
                        "section path rebuilt: {} vertices, {:.3} m",
                        p.len(),
                        p.length()
                    ),
                    None => log::debug!("section path unavailable: too few active wells"),
                }
                path.map(Arc::new)
            })
    }

    /// Width (cm) of the main drawing area.
    pub fn main_area_width(&self) -> f64 {
        self.memo
            .main_area_width
            .get_or_update(self.graph.stamp(Node::MainAreaWidth), || {
                self.section_path()
                    .map(|p| p.length() * self.settings.horizontal_scale * CM_PER_M)
                    .unwrap_or_default()
            })
    }

    /// Height (cm) of the main drawing area.
    pub fn main_area_height(&self) -> f64 {
        self.memo
            .main_area_height
            .get_or_update(self.graph.stamp(Node::MainAreaHeight), || {
                let s = &self.settings;
                (s.top - s.bottom) * s.vertical_scale * CM_PER_M
            })
    }

    /// Width (cm) of the drawing including the decoration columns.
    pub fn section_width(&self) -> f64 {
        self.memo
            .section_width
            .get_or_update(self.graph.stamp(Node::SectionWidth), || {
                let strips = strip_count(&self.settings, &self.decoration_columns);
                self.main_area_width() + strips as f64 * self.settings.decoration_columns_width
            })
    }

    /// Height (cm) of the drawing including the column headers.
    pub fn section_height(&self) -> f64 {
        self.memo
            .section_height
            .get_or_update(self.graph.stamp(Node::SectionHeight), || {
                self.main_area_height() + self.settings.decoration_headers_height
            })
    }

    /// Number of horizontal sampling points across the main area.
    pub fn horizontal_points_count(&self) -> u32 {
        self.memo
            .horizontal_points_count
            .get_or_update(self.graph.stamp(Node::HorizontalPointsCount), || {
                points_count(self.settings.horizontal_resolution, self.main_area_width())
            })
    }

    /// Number of vertical sampling points across the main area.
    pub fn vertical_points_count(&self) -> u32 {
        self.memo
            .vertical_points_count
            .get_or_update(self.graph.stamp(Node::VerticalPointsCount), || {
                points_count(self.settings.vertical_resolution, self.main_area_height())
            })
    }

    /// Depths of each break at the ends of the section path.
    ///
    /// Zero while the structural maps cannot bound the breaks along the path.
    pub fn break_infos(&self) -> Arc<Vec<BreakInfo>> {
        self.memo
            .break_infos
            .get_or_update(self.graph.stamp(Node::BreakInfos), || {
                let path = self.section_path().filter(|p| self.maps_cover(p));
                log::debug!("recomputing break infos");
                let infos = self
                    .breaks
                    .iter()
                    .map(|b| {
                        let info = path.as_ref().and_then(|p| {
                            let maps = closest_structural_maps(b, &self.structural_maps)?;
                            BreakInfo::new(b, maps, p)
                                .map_err(|e| log::warn!("break '{}': {}", b.name(), e))
                                .ok()
                        });
                        info.unwrap_or_else(|| BreakInfo::zero(b))
                    })
                    .collect();
                Arc::new(infos)
            })
    }

    fn maps_cover(&self, path: &SectionPath) -> bool {
        let e = path.aabb();
        self.structural_maps.len() >= 2
            && self.structural_maps.iter().all(|m| m.envelope().contains(&e))
    }

    // ###### VALIDATION ######################################################

    /// The field-level errors of the project.
    pub fn validation(&self) -> Validation {
        self.memo
            .validation
            .get_or_update(self.graph.stamp(Node::Validation), || self.validate())
    }

    fn validate(&self) -> Validation {
        let mut v = self.settings.validate();

        v.ensure(
            self.active_wells().len() >= 2,
            Field::ActiveWells,
            Invalid::TooFewActiveWells,
        );
        v.ensure(
            self.structural_maps.len() >= 2,
            Field::StructuralMaps,
            Invalid::TooFewStructuralMaps,
        );

        match self.section_path() {
            None => v.push(Field::SectionPath, Invalid::NoSectionPath),
            Some(p) => {
                let e = p.aabb();
                for m in &self.structural_maps {
                    v.ensure(
                        m.envelope().contains(&e),
                        Field::SectionPath,
                        Invalid::PathOutsideMap(m.name().to_string()),
                    );
                }
            }
        }

        for (i, f) in self.formations.iter().enumerate() {
            v.ensure(
                !f.validate(&self.breaks).has_errors(),
                Field::OilBearingFormations,
                Invalid::FormationErrors(i),
            );
        }

        for (i, l) in self.well_labels.iter().enumerate() {
            v.ensure(
                !l.validate(&self.wells).has_errors(),
                Field::WellLabels,
                Invalid::LabelErrors(i),
            );
        }

        for c in &self.decoration_columns {
            v.ensure(
                !c.validate().has_errors(),
                Field::DecorationColumns,
                Invalid::ColumnErrors(c.header.clone()),
            );
        }

        v
    }

    pub fn has_errors(&self) -> bool {
        self.validation().has_errors()
    }

    /// Returns if [`Self::build_section`] can succeed.
    pub fn can_build(&self) -> bool {
        !self.has_errors()
    }

    // ###### BUILD ###########################################################

    /// Build the cross-section.
    ///
    /// Only one build runs at a time; a concurrent call fails with [`Error::BuildInProgress`].
    /// A project with field errors fails with [`Error::NotBuildable`].
    pub fn build_section(&self) -> Result<BuildResult> {
        let _guard = BuildGuard::acquire(&self.building)?;

        let validation = self.validation();
        if validation.has_errors() {
            log::debug!("build rejected: {}", validation);
            return Err(Error::NotBuildable(validation));
        }

        let path = self.section_path().ok_or_else(|| {
            let mut v = Validation::new();
            v.push(Field::SectionPath, Invalid::NoSectionPath);
            Error::NotBuildable(v)
        })?;

        log::info!(
            "building section along {:.1} m through {} wells",
            path.length(),
            path.vertices().iter().filter(|v| v.well().is_some()).count()
        );

        let snapshot = section::Snapshot {
            settings: &self.settings,
            wells: self.active_wells(),
            breaks: &self.breaks,
            maps: &self.structural_maps,
            formations: &self.formations,
            labels: &self.well_labels,
            columns: &self.decoration_columns,
            path: &path,
            main_area_width: self.main_area_width(),
            main_area_height: self.main_area_height(),
        };

        section::assemble(&snapshot)
    }
}

/// Clears the build flag when dropped.
struct BuildGuard<'a>(&'a AtomicBool);

impl<'a> BuildGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| BuildGuard(flag))
            .map_err(|_| Error::BuildInProgress)
    }
}

impl<'a> Drop for BuildGuard<'a> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// `resolution × size`, rounded half to even. Zero if either is non-positive or the count overflows an `i32`.
fn points_count(resolution: u32, size_cm: f64) -> u32 {
    let n = resolution as f64 * size_cm;
    if resolution == 0 || !(size_cm > 0.0) || !n.is_finite() || n > i32::MAX as f64 {
        0
    } else {
        n.round_ties_even() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> BuildSettings {
        BuildSettings {
            horizontal_scale: 0.001,
            vertical_scale: 0.001,
            horizontal_resolution: 1,
            vertical_resolution: 1,
            top: -900.0,
            bottom: -1400.0,
            ..Default::default()
        }
    }

    fn project() -> BuildProject {
        let wells = vec![
            dummy_well("W1", [200.0, 500.0], 0.0),
            dummy_well("W2", [400.0, 500.0], 0.0),
            dummy_well("W3", [600.0, 500.0], 0.0),
        ];
        let breaks = vec![Break::new(
            "P1",
            [("W1", 1100.0), ("W2", 1150.0), ("W3", 1180.0)],
            &wells,
        )
        .unwrap()];
        BuildProject::new(wells, breaks, settings())
            .unwrap()
            .with_structural_maps(vec![
                dummy_map("Upper", -1000.0, -0.1, 0.0),
                dummy_map("Lower", -1200.0, -0.2, 0.0),
            ])
    }

    #[test]
    fn construction_errors() {
        let wells = vec![dummy_well("W1", [0.0, 0.0], 0.0)];
        assert!(matches!(
            BuildProject::new(wells, vec![], settings()),
            Err(Error::TooFewWells(1))
        ));

        let wells = vec![
            dummy_well("W1", [0.0, 0.0], 0.0),
            dummy_well("W1", [1.0, 0.0], 0.0),
        ];
        assert!(matches!(
            BuildProject::new(wells, vec![], settings()),
            Err(Error::DuplicateWell(_))
        ));

        let wells = vec![
            dummy_well("W1", [0.0, 0.0], 0.0),
            dummy_well("W2", [1.0, 0.0], 0.0),
        ];
        let b = Break::new("P1", [("W1", 10.0)], &wells).unwrap();
        match BuildProject::new(wells, vec![b], settings()) {
            Err(Error::MissingBreakDepth { break_name, well }) => {
                assert_eq!(break_name, "P1");
                assert_eq!(well, "W2");
            }
            _ => panic!("expected a missing break depth"),
        }
    }

    #[test]
    fn derived_values() {
        let p = project();
        assert_eq!(p.active_wells().len(), 3);
        assert_eq!(p.section_path().unwrap().length(), 400.0);
        // 400 m at 1:1000 is 40 cm, 500 m at 1:1000 is 50 cm
        assert!((p.main_area_width() - 40.0).abs() < 1e-9);
        assert!((p.main_area_height() - 50.0).abs() < 1e-9);
        assert!((p.section_height() - 54.0).abs() < 1e-9);
        // depth ruler on both sides
        assert!((p.section_width() - 42.0).abs() < 1e-9);
        assert_eq!(p.horizontal_points_count(), 40);
        assert_eq!(p.vertical_points_count(), 50);
    }

    #[test]
    fn derived_values_follow_inputs() {
        let mut p = project();
        let before = p.section_path().unwrap();

        p.update_settings(|s| s.offset = 50.0);
        let after = p.section_path().unwrap();
        assert!((after.length() - 500.0).abs() < 1e-9);
        assert!(!Arc::ptr_eq(&before, &after));
        assert!((p.main_area_width() - 50.0).abs() < 1e-9);

        // an unrelated change keeps the cached path
        p.add_well_label(WellLabel::new("W1", -1000.0, -1100.0, "oil"));
        assert!(Arc::ptr_eq(&after, &p.section_path().unwrap()));

        p.set_well_enabled("W3", false);
        assert!((p.section_path().unwrap().length() - 300.0).abs() < 1e-9);
        p.set_well_enabled("W2", false);
        assert!(p.section_path().is_none());
        assert_eq!(p.main_area_width(), 0.0);
        assert_eq!(p.horizontal_points_count(), 0);
        assert!(p
            .validation()
            .errors(Field::ActiveWells)
            .any(|e| *e == Invalid::TooFewActiveWells));
        assert!(!p.set_well_enabled("nope", true));
    }

    #[test]
    fn break_infos_need_covering_maps() {
        let mut p = project();
        let infos = p.break_infos();
        assert_eq!(infos[0].left_depth, -1100.0);
        assert_eq!(infos[0].right_depth, -1180.0);

        p.remove_structural_map("Lower").unwrap();
        let infos = p.break_infos();
        assert_eq!(infos[0].left_depth, 0.0);
        assert_eq!(infos[0].right_depth, 0.0);
    }

    #[test]
    fn validation_reports_fields() {
        let mut p = project();
        assert!(p.can_build());

        p.update_settings(|s| s.top = -2000.0);
        let v = p.validation();
        assert_eq!(v.errors(Field::Top).count(), 1);
        assert!(!p.can_build());
        p.update_settings(|s| s.top = -900.0);
        assert!(p.can_build());

        p.add_oil_bearing_formation(OilBearingFormation::new("P1", "P9"));
        assert_eq!(
            p.validation()
                .errors(Field::OilBearingFormations)
                .collect::<Vec<_>>(),
            vec![&Invalid::FormationErrors(0)]
        );
        p.remove_oil_bearing_formation(0).unwrap();

        p.add_well_label(WellLabel::new("W9", -1000.0, -1100.0, "x"));
        assert_eq!(p.validation().errors(Field::WellLabels).count(), 1);
        p.remove_well_label(0).unwrap();
        assert!(p.remove_well_label(0).is_none());

        // path beyond the map envelope
        p.update_settings(|s| s.offset = 500.0);
        let v = p.validation();
        assert_eq!(
            v.errors(Field::SectionPath).collect::<Vec<_>>(),
            vec![
                &Invalid::PathOutsideMap("Upper".into()),
                &Invalid::PathOutsideMap("Lower".into())
            ]
        );
    }

    #[test]
    fn decoration_column_mode_changes_width() {
        let mut p = project().with_decoration_columns(vec![DecorationColumn {
            header: "Age".into(),
            mode: DecorationColumnMode::Left,
            records: vec![],
        }]);
        assert!((p.section_width() - 43.0).abs() < 1e-9);
        assert!(p.set_decoration_column_mode(0, DecorationColumnMode::LeftAndRight));
        assert!((p.section_width() - 44.0).abs() < 1e-9);
        assert!(!p.set_decoration_column_mode(3, DecorationColumnMode::None));
    }

    #[test]
    fn build_rejects_invalid_project() {
        let mut p = project();
        p.remove_structural_map("Upper").unwrap();
        match p.build_section() {
            Err(Error::NotBuildable(v)) => {
                assert!(v
                    .errors(Field::StructuralMaps)
                    .any(|e| *e == Invalid::TooFewStructuralMaps));
            }
            _ => panic!("expected the build to be rejected"),
        }
    }

    #[test]
    fn one_build_at_a_time() {
        let p = project();
        let held = BuildGuard::acquire(&p.building).unwrap();
        assert!(matches!(p.build_section(), Err(Error::BuildInProgress)));
        drop(held);
        assert!(p.build_section().is_ok());
    }

    #[test]
    fn point_counts() {
        assert_eq!(points_count(10, 2.04), 20);
        assert_eq!(points_count(0, 5.0), 0);
        assert_eq!(points_count(10, 0.0), 0);
        assert_eq!(points_count(10, -1.0), 0);
        assert_eq!(points_count(u32::MAX, 1e6), 0);

        // halves go to the even count
        assert_eq!(points_count(1, 2.5), 2);
        assert_eq!(points_count(1, 3.5), 4);
        assert_eq!(points_count(2, 1.25), 2);
    }
}
