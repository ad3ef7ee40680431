use super::*;

// surfer 6 binary grids serialize as follows:
// **little endian encoding**
// 4 bytes -- "DSBB"
// 2 bytes i16 -- x count
// 2 bytes i16 -- y count
// 8 bytes f64 -- x min
// 8 bytes f64 -- x max
// 8 bytes f64 -- y min
// 8 bytes f64 -- y max
// 8 bytes f64 -- z min
// 8 bytes f64 -- z max
// (4 bytes f32: z) --> repeats for all nodes, row first from y min, blanks are 1.70141e38

const SURFER6_HEADER_LEN: usize = 56;

/// Read a grid file, detecting the format from its leading tag.
///
/// Supported are Surfer 6 binary (`DSBB`) and Surfer ASCII (`DSAA`) grids.
pub fn from_grid_bytes(bytes: &[u8]) -> Result<Grid> {
    match bytes.get(..4) {
        Some(b"DSBB") => from_surfer6_binary(bytes),
        Some(b"DSAA") => from_surfer_ascii(bytes),
        Some(b"DSRB") => Err(grid_err("Surfer 7 grids are not supported")),
        _ => Err(grid_err("unrecognised grid format")),
    }
}

pub fn from_surfer6_binary(bytes: &[u8]) -> Result<Grid> {
    fn de(bytes: &[u8]) -> DeResult<Grid> {
        let mut c = Cursor::new(bytes);

        let mut tag = [0; 4];
        c.read_exact(&mut tag)?;
        if &tag != b"DSBB" {
            return Err("expecting the leading tag to be DSBB".into());
        }

        let xn = c.read_i16::<LE>()?;
        let yn = c.read_i16::<LE>()?;
        let x = [c.read_f64::<LE>()?, c.read_f64::<LE>()?];
        let y = [c.read_f64::<LE>()?, c.read_f64::<LE>()?];
        let _ = [c.read_f64::<LE>()?, c.read_f64::<LE>()?]; // z range

        // the header is untrusted, size the body before allocating nodes
        let needed = 4 * i64::from(xn).max(0) * i64::from(yn).max(0);
        let found = bytes.len().saturating_sub(SURFER6_HEADER_LEN) as i64;
        if found < needed {
            return Err(format!(
                "expecting {} bytes of node data for {}x{} nodes, found {}",
                needed, xn, yn, found
            )
            .into());
        }

        let mut grid = new_grid(xn.into(), yn.into(), x, y)?;
        for (x, y) in nodes(&grid) {
            let z = c.read_f32::<LE>()?;
            grid.set(x, y, (z < SURFER_BLANK as f32).then(|| z as f64));
        }

        Ok(grid)
    }

    let grid = de(bytes).map_err(grid_err)?;
    log::trace!(
        "read Surfer 6 binary grid, {} of {} nodes present",
        grid.len_nonempty(),
        grid.len()
    );
    Ok(grid)
}

pub fn from_surfer_ascii(bytes: &[u8]) -> Result<Grid> {
    type Header = (f64, f64, [f64; 2], [f64; 2]);

    fn de(s: &str) -> std::result::Result<(Header, Vec<f64>), nom::Err<()>> {
        use nom::{
            bytes::complete::*, character::complete::*, multi::*, number::complete::*,
            sequence::*, IResult, Parser,
        };
        // define the parsers
        fn ws<'a, G, O>(g: G) -> impl FnMut(&'a str) -> IResult<&'a str, O, ()>
        where
            G: Parser<&'a str, O, ()>,
        {
            preceded(multispace0, g)
        }
        let n = |i| ws(double)(i);

        let (s, _) = ws(tag("DSAA"))(s)?;
        let (s, (xn, yn)) = tuple((n, n))(s)?;
        let (s, (xlo, xhi, ylo, yhi, _, _)) = tuple((n, n, n, n, n, n))(s)?;

        let count = (xn.max(0.0) * yn.max(0.0)) as usize;
        let (_, zs) = many_m_n(count, count, n)(s)?;

        Ok(((xn, yn, [xlo, xhi], [ylo, yhi]), zs))
    }

    let s = std::str::from_utf8(bytes).map_err(|_| grid_err("expecting grid as utf8 text"))?;
    let ((xn, yn, x, y), zs) = de(s).map_err(|_| grid_err("malformed Surfer ASCII grid"))?;

    if xn.fract() != 0.0 || yn.fract() != 0.0 {
        return Err(grid_err("node counts must be whole numbers"));
    }

    let mut grid = new_grid(xn as i64, yn as i64, x, y).map_err(grid_err)?;
    for ((x, y), z) in nodes(&grid).zip(zs) {
        grid.set(x, y, (z < SURFER_BLANK).then(|| z));
    }

    log::trace!(
        "read Surfer ASCII grid, {} of {} nodes present",
        grid.len_nonempty(),
        grid.len()
    );
    Ok(grid)
}

/// Write a grid as a Surfer 6 binary grid.
pub fn to_surfer6_binary(grid: &Grid) -> Result<Vec<u8>> {
    let count = |n: usize| {
        i16::try_from(n).map_err(|_| grid_err(format!("{} nodes exceed a Surfer 6 grid", n)))
    };
    let xn = count(grid.x_count())?;
    let yn = count(grid.y_count())?;

    let extents = grid.extents();
    let [xlo, ylo] = extents.origin;
    let [xhi, yhi] = extents.max();

    let (zlo, zhi) = grid
        .values()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), z| {
            (lo.min(*z), hi.max(*z))
        });
    let (zlo, zhi) = if grid.len_nonempty() == 0 {
        (0.0, 0.0)
    } else {
        (zlo, zhi)
    };

    let mut wtr = Vec::with_capacity(SURFER6_HEADER_LEN + grid.len() * 4);
    wtr.extend_from_slice(b"DSBB");
    wtr.write_i16::<LE>(xn)?;
    wtr.write_i16::<LE>(yn)?;
    for v in [xlo, xhi, ylo, yhi, zlo, zhi] {
        wtr.write_f64::<LE>(v)?;
    }

    for (x, y) in nodes(grid) {
        let z = grid.get(x, y).map(|z| *z as f32);
        wtr.write_f32::<LE>(z.unwrap_or(SURFER_BLANK as f32))?;
    }

    Ok(wtr)
}

fn new_grid(xn: i64, yn: i64, x: [f64; 2], y: [f64; 2]) -> DeResult<Grid> {
    if xn < 2 || yn < 2 {
        return Err(format!("expecting at least 2 nodes per axis, found {}x{}", xn, yn).into());
    }

    let spacing = [
        (x[1] - x[0]) / (xn - 1) as f64,
        (y[1] - y[0]) / (yn - 1) as f64,
    ];
    if spacing.iter().any(|s| !(s.is_finite() && *s > 0.0)) {
        return Err("grid bounds must be increasing".into());
    }

    Ok(Grid::new(
        [x[0], y[0]],
        xn as usize,
        yn as usize,
        spacing,
    ))
}

/// Node indices in file order: rows from y min, x increasing first.
fn nodes(grid: &Grid) -> impl Iterator<Item = (usize, usize)> {
    let (xn, yn) = (grid.x_count(), grid.y_count());
    (0..yn).flat_map(move |y| (0..xn).map(move |x| (x, y)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASCII: &str = "DSAA
3 2
0 20
100 110
-1050 -1000
-1000 -1010 -1020
-1030 1.70141e+38 -1050
";

    #[test]
    fn surfer_ascii() {
        let g = from_grid_bytes(ASCII.as_bytes()).unwrap();
        assert_eq!(g.x_count(), 3);
        assert_eq!(g.y_count(), 2);
        assert_eq!(g.origin(), [0.0, 100.0]);
        assert_eq!(g.spacing(), [10.0, 10.0]);
        assert_eq!(g.get(2, 0), Some(&-1020.0));
        assert_eq!(g.get(0, 1), Some(&-1030.0));
        assert_eq!(g.get(1, 1), None);
        assert_eq!(g.len_nonempty(), 5);
    }

    #[test]
    fn surfer6_binary_survives_writing() {
        let g = from_surfer_ascii(ASCII.as_bytes()).unwrap();
        let bytes = to_surfer6_binary(&g).unwrap();
        assert_eq!(&bytes[..4], b"DSBB");
        assert_eq!(bytes.len(), 56 + 6 * 4);

        let b = from_grid_bytes(&bytes).unwrap();
        assert_eq!(b.origin(), g.origin());
        assert_eq!(b.spacing(), g.spacing());
        assert_eq!(b.get(1, 1), None);
        assert_eq!(b.get(2, 1), Some(&-1050.0));
    }

    #[test]
    fn malformed_grids() {
        assert!(matches!(from_grid_bytes(b"GRID"), Err(Error::Grid(_))));
        assert!(matches!(from_grid_bytes(b"DS"), Err(Error::Grid(_))));

        // truncated body
        let g = from_surfer_ascii(ASCII.as_bytes()).unwrap();
        let bytes = to_surfer6_binary(&g).unwrap();
        assert!(matches!(
            from_grid_bytes(&bytes[..bytes.len() - 2]),
            Err(Error::Grid(_))
        ));

        // a header promising more nodes than the file holds
        let mut huge = bytes[..SURFER6_HEADER_LEN].to_vec();
        huge[4..8].copy_from_slice(&[0xff, 0x7f, 0xff, 0x7f]);
        match from_grid_bytes(&huge) {
            Err(Error::Grid(msg)) => assert!(msg.contains("32767x32767"), "{}", msg),
            _ => panic!("expected an oversized header to be rejected"),
        }

        // too few values
        let short = "DSAA 3 2 0 20 100 110 0 1 1 2 3";
        assert!(matches!(
            from_grid_bytes(short.as_bytes()),
            Err(Error::Grid(_))
        ));

        // a single column
        let thin = "DSAA 1 2 0 0 0 10 0 1 1 2";
        assert!(matches!(
            from_grid_bytes(thin.as_bytes()),
            Err(Error::Grid(_))
        ));
    }
}
