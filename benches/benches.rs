use criterion::*;
use geosection::*;

fn plane(name: &str, size: usize, a: f64, b: f64) -> StructuralMap {
    let mut g = Grid::new([0.0, 0.0], size, size, [10.0, 10.0]);
    for y in 0..size {
        for x in 0..size {
            let [px, py] = g.get_xy(x, y);
            g.set(x, y, a + b * px - 0.01 * py);
        }
    }
    StructuralMap::new(name, g)
}

fn wells(count: usize) -> Vec<Well> {
    (0..count)
        .map(|i| {
            let x = 100.0 + i as f64 * 150.0;
            let y = 200.0 + (i % 2) as f64 * 80.0;
            Well::new(
                format!("W{}", i),
                0.0,
                [x, y],
                3000.0,
                vec![GeophysicalData::new(0.0, 0.0, 3000.0, i as f64).unwrap()],
                true,
            )
            .unwrap()
        })
        .collect()
}

fn project(well_count: usize, resolution: u32) -> BuildProject {
    let wells = wells(well_count);
    let breaks = (0..5)
        .map(|b| {
            let values = wells
                .iter()
                .enumerate()
                .map(|(i, w)| (w.name().to_string(), 1100.0 + b as f64 * 40.0 + i as f64 * 5.0))
                .collect::<Vec<_>>();
            Break::new(format!("B{}", b), values, &wells).unwrap()
        })
        .collect();
    let settings = BuildSettings {
        horizontal_scale: 0.001,
        vertical_scale: 0.001,
        horizontal_resolution: resolution,
        vertical_resolution: resolution,
        offset: 50.0,
        top: -900.0,
        bottom: -1600.0,
        ..Default::default()
    };

    BuildProject::new(wells, breaks, settings)
        .unwrap()
        .with_structural_maps(vec![
            plane("Upper", 201, -1000.0, -0.05),
            plane("Lower", 201, -1400.0, -0.1),
        ])
}

fn grids(c: &mut Criterion) {
    c.bench_function("grid sample 11", |b| {
        let m = plane("m", 11, -1000.0, -0.1);
        b.iter(|| m.grid().sample([53.3, 71.9]))
    });

    c.bench_function("grid sample 201", |b| {
        let m = plane("m", 201, -1000.0, -0.1);
        b.iter(|| m.grid().sample([1053.3, 1771.9]))
    });
}

fn breaks(c: &mut Criterion) {
    c.bench_function("closest structural maps", |b| {
        let p = project(4, 10);
        b.iter(|| closest_structural_maps(&p.breaks()[2], p.structural_maps()))
    });

    c.bench_function("break profile 4 wells", |b| {
        let p = project(4, 10);
        let path = p.section_path().unwrap();
        let brk = &p.breaks()[2];
        let maps = closest_structural_maps(brk, p.structural_maps()).unwrap();
        b.iter(|| break_profile(brk, maps, &path, p.settings(), 1.0))
    });

    c.bench_function("break profile 12 wells", |b| {
        let p = project(12, 10);
        let path = p.section_path().unwrap();
        let brk = &p.breaks()[2];
        let maps = closest_structural_maps(brk, p.structural_maps()).unwrap();
        b.iter(|| break_profile(brk, maps, &path, p.settings(), 1.0))
    });
}

fn sections(c: &mut Criterion) {
    c.bench_function("build section small", |b| {
        let p = project(4, 2);
        b.iter(|| p.build_section())
    });

    c.bench_function("build section large", |b| {
        let p = project(12, 10);
        b.iter(|| p.build_section())
    });

    c.bench_function("derived values after settings change", |b| {
        let mut p = project(12, 10);
        b.iter(|| {
            p.update_settings(|s| s.horizontal_resolution ^= 1);
            (p.section_width(), p.horizontal_points_count())
        })
    });
}

criterion_group!(benches, grids, breaks, sections);
criterion_main!(benches);
