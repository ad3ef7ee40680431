//! Assembly of a [`BuildResult`] from a validated project snapshot.
use crate::*;
use rayon::prelude::*;

/// Width (cm) of a well label box.
const WELL_LABEL_WIDTH: f64 = 0.6;
/// Height (cm) of the well marker foot above the bottom of the drawing.
const WELL_MARKER_FOOT: f64 = 0.6;

/// The project values a build reads.
pub(crate) struct Snapshot<'a> {
    pub settings: &'a BuildSettings,
    pub wells: Vec<&'a Well>,
    pub breaks: &'a [Break],
    pub maps: &'a [StructuralMap],
    pub formations: &'a [OilBearingFormation],
    pub labels: &'a [WellLabel],
    pub columns: &'a [DecorationColumn],
    pub path: &'a SectionPath,
    pub main_area_width: f64,
    pub main_area_height: f64,
}

pub(crate) fn assemble(snap: &Snapshot) -> Result<BuildResult> {
    let s = snap.settings;
    let path = snap.path;
    let left = left_columns_width(s, snap.columns);

    let lines = snap
        .breaks
        .par_iter()
        .map(|brk| {
            let maps = closest_structural_maps(brk, snap.maps).ok_or_else(too_few_maps)?;
            let coords = break_profile(brk, maps, path, s, left)?;
            Ok(BreakLine { brk, maps, coords })
        })
        .collect::<Result<Vec<_>>>()?;
    log::debug!("interpolated {} break lines", lines.len());

    let by_name = lines
        .iter()
        .enumerate()
        .map(|(i, l)| (l.brk.name(), i))
        .collect::<HashMap<_, _>>();

    let geophysical = snap
        .wells
        .par_iter()
        .map(|w| well_samples(s, path, w, left))
        .collect::<Result<Vec<_>>>()?;

    let section_area = Feature::new(Geometry::Polygon(Polygon2::rectangle(
        [left, snap.main_area_height],
        [left + snap.main_area_width, 0.0],
    )));

    let wells = snap
        .wells
        .iter()
        .map(|w| {
            let x = s.to_section_x(well_distance(path, w.name())?, left);
            Ok(Feature::new(Geometry::LineString(well_marker(
                x,
                snap.main_area_height + WELL_MARKER_FOOT,
                WELL_MARKER_FOOT,
            )))
            .with("Well", w.name())
            .with("Altitude", w.altitude())
            .with("Bottom", w.bottom()))
        })
        .collect::<Result<Vec<_>>>()?;

    let structural_maps = snap
        .maps
        .iter()
        .map(|m| {
            map_cross_section(m, path, s, left)
                .map(|cs| Feature::new(Geometry::LineString(cs)).with("Name", m.name()))
        })
        .collect::<Result<Vec<_>>>()?;

    let breaks = break_features(&lines, path, s);

    let well_points = snap
        .wells
        .iter()
        .map(|w| Feature::new(Geometry::Point(w.location())).with("Name", w.name()))
        .collect();

    let section_path = Feature::new(Geometry::LineString(path.pts().to_vec()));

    let clip_areas = clip_area(&lines).into_iter().collect();

    let decoration_columns = decoration_features(s, snap.columns, snap.main_area_width);

    let oil_bearing_formations = snap
        .formations
        .iter()
        .filter_map(|f| {
            let line = |name: &Option<String>| {
                name.as_deref()
                    .and_then(|n| by_name.get(n))
                    .map(|i| lines[*i].coords.as_slice())
            };
            let ring = between(line(&f.top_break)?, line(&f.bottom_break)?);
            if ring.is_none() {
                log::warn!(
                    "formation {:?}..{:?} has too few points to form an area",
                    f.top_break,
                    f.bottom_break
                );
            }
            ring
        })
        .collect();

    let well_labels = snap
        .labels
        .iter()
        .filter(|l| l.is_visible(s))
        .filter_map(|l| {
            let x = s.to_section_x(path.well_distance(&l.well)?, left);
            let half = WELL_LABEL_WIDTH / 2.0;
            let rect = Polygon2::rectangle(
                [x - half, s.to_section_y(l.top)],
                [x + half, s.to_section_y(l.bottom)],
            );
            Some(
                Feature::new(Geometry::Polygon(rect))
                    .with("Well", l.well.as_str())
                    .with("Text", l.text.as_str()),
            )
        })
        .collect();

    let zero_mark = (s.bottom <= 0.0 && 0.0 <= s.top).then(|| {
        let y = s.to_section_y(0.0);
        Feature::new(Geometry::LineString(vec![
            [left, y],
            [left + snap.main_area_width, y],
        ]))
    });

    let result = BuildResult {
        settings: s.clone(),
        geophysical,
        section_area,
        wells,
        structural_maps,
        breaks,
        well_points,
        section_path,
        clip_areas,
        decoration_columns,
        oil_bearing_formations,
        well_labels,
        zero_mark,
    };

    log::info!(
        "section built: {} wells, {} breaks, {} structural maps, {} decoration features",
        result.wells.len(),
        result.breaks.len(),
        result.structural_maps.len(),
        result.decoration_columns.len()
    );

    Ok(result)
}

fn too_few_maps() -> Error {
    let mut v = Validation::new();
    v.push(Field::StructuralMaps, Invalid::TooFewStructuralMaps);
    Error::NotBuildable(v)
}

fn well_distance(path: &SectionPath, well: &str) -> Result<f64> {
    path.well_distance(well)
        .ok_or_else(|| Error::WellNotOnPath(well.to_string()))
}

/// Geophysical values from the settings' bottom to top at the vertical step.
fn well_samples(
    s: &BuildSettings,
    path: &SectionPath,
    well: &Well,
    left: f64,
) -> Result<WellSamples> {
    let step = s.vertical_step();
    if !(step.is_finite() && step > 0.0) {
        return Err(Error::InvalidStep(step));
    }

    let x = well_distance(path, well.name())?;
    let scaled_x = s.to_section_x(x, left);

    let mut samples = Vec::new();
    let mut y = s.bottom;
    while y < s.top {
        samples.push(GeophysicalSample {
            x,
            y,
            scaled_x,
            scaled_y: s.to_section_y(y),
            value: well.geophysical_value(y).unwrap_or_default(),
        });
        y += step;
    }

    Ok(WellSamples {
        well: well.name().to_string(),
        samples,
    })
}

/// The well marker glyph: a foot, a flag, and a stem up to `upper`.
fn well_marker(x: f64, upper: f64, lower: f64) -> Vec<Point2> {
    vec![
        [x, lower],
        [x - 0.2, lower],
        [x + 0.2, lower],
        [x, lower],
        [x, lower + 0.5],
        [x + 0.3, lower + 0.5],
        [x - 0.3, lower + 0.75],
        [x, lower + 0.75],
        [x, upper],
    ]
}

/// The ring between two lines: `top` forward, `bottom` reversed.
fn between(top: &[Point2], bottom: &[Point2]) -> Option<Feature> {
    let ring = top.iter().chain(bottom.iter().rev()).copied();
    Polygon2::new(ring)
        .ok()
        .map(|p| Feature::new(Geometry::Polygon(p)))
}

/// The area between the highest and the lowest break line, judged at the start of the path.
fn clip_area(lines: &[BreakLine]) -> Option<Feature> {
    let first_y = |l: &BreakLine| l.coords.first().map(|p| p[1]);
    let highest = lines
        .iter()
        .filter(|l| first_y(*l).is_some())
        .reduce(|x, y| if first_y(x) > first_y(y) { x } else { y })?;
    let lowest = lines
        .iter()
        .filter(|l| first_y(*l).is_some())
        .reduce(|x, y| if first_y(x) < first_y(y) { x } else { y })?;

    between(&highest.coords, &lowest.coords)
}
