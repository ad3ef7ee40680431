//! Break depth interpolation between a pair of bounding structural maps.
//!
//! A break is known only at the wells. Between them its depth follows the band formed by the
//! structural map above and the structural map below: the fractional position of the break
//! within the band at a well is carried along the section path.
use crate::*;
use serde::Serialize;

/// The structural maps bounding a break.
#[derive(Copy, Clone, Debug)]
pub struct MapPair<'a> {
    pub above: &'a StructuralMap,
    pub below: &'a StructuralMap,
}

impl<'a> MapPair<'a> {
    /// Sample both maps at `p`.
    pub fn band(&self, p: Point2) -> Band {
        Band {
            top: self.above.get_z(p),
            bottom: self.below.get_z(p),
        }
    }
}

/// Elevations of the upper and lower bounding surfaces at a plan location.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Band {
    pub top: f64,
    pub bottom: f64,
}

impl Band {
    pub fn new(top: f64, bottom: f64) -> Self {
        Self { top, bottom }
    }

    /// Returns if the surfaces meet, which leaves the band without a height.
    pub fn is_degenerate(&self) -> bool {
        self.bottom - self.top == 0.0
    }
}

/// Depth of a break at a point, given its known depth at a reference.
///
/// `bottom(p) - (bottom(ref) - known) * (bottom(p) - top(p)) / (bottom(ref) - top(ref))`
///
/// There is no guard against a degenerate reference band; the result is then non-finite.
///
/// # Example
/// ```rust
/// # use geosection::*;
/// // a quarter of the way down the band at the reference
/// let d = break_depth(Band::new(-10.0, -30.0), Band::new(-100.0, -140.0), -110.0);
/// assert_eq!(d, -15.0);
/// ```
pub fn break_depth(at: Band, reference: Band, known: f64) -> f64 {
    at.bottom - (reference.bottom - known) * (at.bottom - at.top) / (reference.bottom - reference.top)
}

/// A convex combination of [`break_depth`] anchored at two references.
///
/// `coefficient` is the fraction of the segment travelled from the left reference.
pub fn blended_break_depth(
    at: Band,
    (left, left_known): (Band, f64),
    (right, right_known): (Band, f64),
    coefficient: f64,
) -> f64 {
    (1.0 - coefficient) * break_depth(at, left, left_known)
        + coefficient * break_depth(at, right, right_known)
}

/// Break depth at `p` anchored at `reference`, both sampled from `maps`.
pub fn depth_at(maps: MapPair, p: Point2, reference: Point2, known: f64) -> f64 {
    break_depth(maps.band(p), maps.band(reference), known)
}

/// Select the structural maps bounding a break's mean elevation.
///
/// The map above is the candidate with the lowest maximum among the maps reaching above the
/// mean. The map below is the candidate with the highest maximum among the other maps reaching
/// below the mean. A side without candidates falls back to every map. Ties resolve to the later
/// map.
///
/// Returns `None` if there are fewer than two maps.
pub fn closest_structural_maps<'a>(brk: &Break, maps: &'a [StructuralMap]) -> Option<MapPair<'a>> {
    if maps.len() < 2 {
        return None;
    }

    let avg = brk.average_absolute();

    let mut above = maps.iter().filter(|m| m.max() > avg).peekable();
    let above = if above.peek().is_some() {
        above.reduce(lowest_max)
    } else {
        maps.iter().reduce(lowest_max)
    }?;

    let others = || maps.iter().filter(|m| !std::ptr::eq(*m, above));
    let mut below = others().filter(|m| m.min() < avg).peekable();
    let below = if below.peek().is_some() {
        below.reduce(highest_max)
    } else {
        others().reduce(highest_max)
    }?;

    Some(MapPair { above, below })
}

fn lowest_max<'a>(x: &'a StructuralMap, y: &'a StructuralMap) -> &'a StructuralMap {
    if x.max() < y.max() {
        x
    } else {
        y
    }
}

fn highest_max<'a>(x: &'a StructuralMap, y: &'a StructuralMap) -> &'a StructuralMap {
    if x.max() > y.max() {
        x
    } else {
        y
    }
}

/// Points from `from` towards `to`, `step` apart, while at least `step` remains.
fn march(from: Point2, to: Point2, step: f64) -> impl Iterator<Item = Point2> {
    std::iter::successors(Some(from), move |p| Some(offset_towards(*p, to, step)))
        .take_while(move |p| dist(*p, to) >= step)
}

fn check_step(step: f64) -> Result<()> {
    if step.is_finite() && step > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidStep(step))
    }
}

fn known_depth(brk: &Break, well: &str) -> Result<f64> {
    brk.absolute_value(well)
        .ok_or_else(|| Error::MissingBreakDepth {
            break_name: brk.name().to_string(),
            well: well.to_string(),
        })
}

fn warn_degenerate(brk: &Break, reference: Band, at: Point2) {
    if reference.is_degenerate() {
        log::warn!(
            "structural maps bounding break '{}' meet at {:?}; depths are not finite",
            brk.name(),
            at
        );
    }
}

/// The depth profile of a break along the section path, in drawing coordinates (cm).
///
/// Each segment is walked from its left vertex in `horizontal_step` increments:
/// - well to well: both wells anchor the depth, blended by the distance travelled,
/// - offset to well: the right well anchors the depth,
/// - well to offset: the left well anchors the depth, and a closing point is added at the end
///   of the path.
///
/// A segment without a well at either end, or with an offset vertex on a path that has no
/// offset, is an [`Error::UnanchoredSegment`].
pub fn break_profile(
    brk: &Break,
    maps: MapPair,
    path: &SectionPath,
    settings: &BuildSettings,
    left_width: f64,
) -> Result<Vec<Point2>> {
    let step = settings.horizontal_step();
    check_step(step)?;

    let vertices = path.vertices();
    let mut coords = Vec::new();

    for (i, l, r) in path.segments() {
        let (lwell, rwell) = (vertices[i].well(), vertices[i + 1].well());
        let one_sided = lwell.is_none() || rwell.is_none();
        if (lwell.is_none() && rwell.is_none()) || (one_sided && !path.has_offset()) {
            return Err(Error::UnanchoredSegment(i));
        }

        let base = path.length_to(i);
        let seg = dist(l, r);
        let x = |k: usize| settings.to_section_x(base + k as f64 * step, left_width);
        let y = |depth: f64| settings.to_section_y(depth);

        match (lwell, rwell) {
            (None, Some(rw)) => {
                let known = known_depth(brk, rw)?;
                let reference = maps.band(r);
                warn_degenerate(brk, reference, r);
                coords.extend(march(l, r, step).enumerate().map(|(k, p)| {
                    [x(k), y(break_depth(maps.band(p), reference, known))]
                }));
            }
            (Some(lw), None) => {
                let known = known_depth(brk, lw)?;
                let reference = maps.band(l);
                warn_degenerate(brk, reference, l);
                coords.extend(march(l, r, step).enumerate().map(|(k, p)| {
                    [x(k), y(break_depth(maps.band(p), reference, known))]
                }));
                coords.push([
                    settings.to_section_x(path.length(), left_width),
                    y(break_depth(maps.band(r), reference, known)),
                ]);
            }
            (Some(lw), Some(rw)) => {
                let left = (maps.band(l), known_depth(brk, lw)?);
                let right = (maps.band(r), known_depth(brk, rw)?);
                warn_degenerate(brk, left.0, l);
                warn_degenerate(brk, right.0, r);
                coords.extend(march(l, r, step).enumerate().map(|(k, p)| {
                    let c = dist(l, p) / seg;
                    [x(k), y(blended_break_depth(maps.band(p), left, right, c))]
                }));
            }
            (None, None) => return Err(Error::UnanchoredSegment(i)),
        }
    }

    Ok(coords)
}

/// A break's profile along with the maps it was interpolated between.
#[derive(Clone, Debug)]
pub struct BreakLine<'a> {
    pub brk: &'a Break,
    pub maps: MapPair<'a>,
    pub coords: Vec<Point2>,
}

/// How a break line sits relative to the others.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BreakType {
    Top,
    Middle,
    Bottom,
}

impl BreakType {
    pub fn as_str(self) -> &'static str {
        match self {
            BreakType::Top => "Top",
            BreakType::Middle => "Middle",
            BreakType::Bottom => "Bottom",
        }
    }
}

/// Mean drawing y (cm) of the upper and lower maps, sampled along the path at the horizontal
/// step.
pub fn band_averages(maps: MapPair, path: &SectionPath, settings: &BuildSettings) -> (f64, f64) {
    let step = settings.horizontal_step();
    let (top, bottom, n) = path
        .segments()
        .flat_map(|(_, l, r)| march(l, r, step).take_while(move |p| dist(*p, r) > step))
        .map(|p| maps.band(p))
        .fold((0.0, 0.0, 0usize), |(t, b, n), band| {
            (
                t + settings.to_section_y(band.top),
                b + settings.to_section_y(band.bottom),
                n + 1,
            )
        });

    (top / n as f64, bottom / n as f64)
}

/// Turn break lines into features.
///
/// Each feature carries the break `Name`, its relative position `A` within the band of its
/// bounding maps (0 at the lower map, 1 at the upper), and a `Type`. The line reaching highest is
/// tagged `Top`, the line reaching lowest `Bottom`, all others `Middle`.
pub fn break_features(
    lines: &[BreakLine],
    path: &SectionPath,
    settings: &BuildSettings,
) -> Vec<Feature> {
    let mut features = lines
        .iter()
        .map(|line| {
            let (top, bottom) = band_averages(line.maps, path, settings);
            let mean_y = crate::breaks::mean(line.coords.iter().map(|p| p[1]));
            Feature::new(Geometry::LineString(line.coords.clone()))
                .with("Name", line.brk.name())
                .with("A", (bottom - mean_y) / (bottom - top))
                .with("Type", BreakType::Middle.as_str())
        })
        .collect::<Vec<_>>();

    let extremes = features
        .iter()
        .map(|f| {
            f.geometry
                .coords()
                .iter()
                .fold((f64::NEG_INFINITY, f64::INFINITY), |(hi, lo), p| {
                    (hi.max(p[1]), lo.min(p[1]))
                })
        })
        .collect::<Vec<_>>();

    let top = (0..extremes.len()).reduce(|x, y| if extremes[x].0 > extremes[y].0 { x } else { y });
    let bottom =
        (0..extremes.len()).reduce(|x, y| if extremes[x].1 < extremes[y].1 { x } else { y });

    if let Some(i) = top {
        features[i].set("Type", BreakType::Top.as_str());
    }
    if let Some(i) = bottom {
        features[i].set("Type", BreakType::Bottom.as_str());
    }

    features
}

/// Depths of a break at the two ends of the section path.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BreakInfo {
    pub break_name: String,
    pub left_depth: f64,
    pub right_depth: f64,
}

impl BreakInfo {
    /// Zero depths, for a project whose structural maps cannot bound the break.
    pub fn zero(brk: &Break) -> Self {
        Self {
            break_name: brk.name().to_string(),
            left_depth: 0.0,
            right_depth: 0.0,
        }
    }

    /// Depths at the path ends.
    ///
    /// Without offset these are the known depths at the end wells, otherwise they are
    /// interpolated at the offset points from the adjacent end well.
    pub fn new(brk: &Break, maps: MapPair, path: &SectionPath) -> Result<Self> {
        let (pts, vertices) = (path.pts(), path.vertices());
        let n = pts.len();

        let end = |at: usize, well: usize| -> Result<f64> {
            let name = vertices[well]
                .well()
                .ok_or(Error::UnanchoredSegment(well.min(n - 2)))?;
            let known = known_depth(brk, name)?;
            if at == well {
                Ok(known)
            } else {
                Ok(depth_at(maps, pts[at], pts[well], known))
            }
        };

        let (left, right) = if path.has_offset() {
            (end(0, 1)?, end(n - 1, n - 2)?)
        } else {
            (end(0, 0)?, end(n - 1, n - 1)?)
        };

        Ok(Self {
            break_name: brk.name().to_string(),
            left_depth: left,
            right_depth: right,
        })
    }
}

/// A structural map's elevation along the section path, in drawing coordinates (cm).
///
/// Sampled at the horizontal step along each segment, closed by the path's final vertex.
pub fn map_cross_section(
    map: &StructuralMap,
    path: &SectionPath,
    settings: &BuildSettings,
    left_width: f64,
) -> Result<Vec<Point2>> {
    let step = settings.horizontal_step();
    check_step(step)?;

    let mut coords = path
        .segments()
        .flat_map(|(i, l, r)| {
            let base = path.length_to(i);
            march(l, r, step).enumerate().map(move |(k, p)| {
                [
                    settings.to_section_x(base + k as f64 * step, left_width),
                    settings.to_section_y(map.get_z(p)),
                ]
            })
        })
        .collect::<Vec<_>>();

    let end = path.line().last();
    coords.push([
        settings.to_section_x(path.length(), left_width),
        settings.to_section_y(map.get_z(end)),
    ]);

    let blanks = blank_samples(&coords);
    if blanks > 0 {
        log::warn!(
            "structural map '{}' has no data at {} of {} samples along the section",
            map.name(),
            blanks,
            coords.len()
        );
    }

    Ok(coords)
}

/// Samples without an elevation.
fn blank_samples(coords: &[Point2]) -> usize {
    coords.iter().filter(|p| !p[1].is_finite()).count()
}
