//! Protein Data Bank coordinate loader.
//!
//! Only the records needed for bead positions are read: `ATOM`/`HETATM` coordinates and the
//! `MODEL`/`ENDMDL` frame brackets. Coordinates are converted from Ångström to nanometres.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use chrom_core::{point::weighted_centroid, Chain, Point3};

use crate::IoError;

/// Ångström per nanometre
const ANGSTROM_PER_NM: f64 = 10.;

/// Atomic mass of an element symbol, unknown elements weigh 1
pub fn atomic_mass(element: &str) -> f64 {
    match element.to_ascii_uppercase().as_str() {
        "H" => 1.008,
        "C" => 12.011,
        "N" => 14.007,
        "O" => 15.999,
        "P" => 30.974,
        "S" => 32.06,
        _ => 1.,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub location: Point3,
    pub element: String,
}

impl Atom {
    pub fn mass(&self) -> f64 {
        atomic_mass(&self.element)
    }
}

/// Atoms of one model
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub atoms: Vec<Atom>,
}

impl Frame {
    /// Mass weighted center of all atoms
    pub fn center_of_mass(&self) -> Option<Point3> {
        let (points, masses): (Vec<Point3>, Vec<f64>) =
            self.atoms.iter().map(|a| (a.location, a.mass())).unzip();
        weighted_centroid(&points, &masses)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Structure {
    pub frames: Vec<Frame>,
}

impl Structure {
    pub fn num_atoms(&self) -> usize {
        self.frames.iter().map(|f| f.atoms.len()).sum()
    }

    /// Beads of all frames in file order
    pub fn beads(&self) -> Vec<Point3> {
        self.frames
            .iter()
            .flat_map(|f| f.atoms.iter().map(|a| a.location))
            .collect()
    }

    /// One center of mass per frame
    pub fn centers(&self) -> Vec<Point3> {
        self.frames
            .iter()
            .filter_map(Frame::center_of_mass)
            .collect()
    }

    pub fn into_chain(self) -> Chain {
        Chain::new(self.beads(), self.centers())
    }
}

/// Line based PDB reader
pub struct PdbReader<R> {
    reader: R,
}

impl PdbReader<BufReader<File>> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, IoError> {
        Ok(PdbReader::new(BufReader::new(File::open(path)?)))
    }
}

impl<R: BufRead> PdbReader<R> {
    pub fn new(reader: R) -> Self {
        PdbReader { reader }
    }

    pub fn read(self) -> Result<Structure, IoError> {
        let mut structure = Structure::default();
        let mut frame = Frame::default();

        for (i, line) in self.reader.lines().enumerate() {
            let line = line?;
            let record = line.get(..6).unwrap_or(&line).trim_end();

            match record {
                "MODEL" | "ENDMDL" => {
                    if !frame.atoms.is_empty() {
                        structure.frames.push(std::mem::take(&mut frame));
                    }
                }
                "ATOM" | "HETATM" => frame.atoms.push(parse_atom(&line, i + 1)?),
                "END" => break,
                _ => {}
            }
        }
        if !frame.atoms.is_empty() {
            structure.frames.push(frame);
        }

        if structure.num_atoms() == 0 {
            return Err(IoError::EmptyStructure);
        }

        tracing::debug!(
            "Read {} atoms in {} frames",
            structure.num_atoms(),
            structure.frames.len()
        );

        Ok(structure)
    }
}

fn parse_atom(line: &str, number: usize) -> Result<Atom, IoError> {
    let coordinate = |range: std::ops::Range<usize>, axis: &str| -> Result<f64, IoError> {
        let field = line.get(range).ok_or_else(|| IoError::Pdb {
            line: number,
            message: format!("missing {axis} coordinate"),
        })?;
        field
            .trim()
            .parse::<f64>()
            .map(|v| v / ANGSTROM_PER_NM)
            .map_err(|e| IoError::Pdb {
                line: number,
                message: format!("invalid {axis} coordinate `{}`: {e}", field.trim()),
            })
    };

    let location = Point3::from([
        coordinate(30..38, "x")?,
        coordinate(38..46, "y")?,
        coordinate(46..54, "z")?,
    ]);

    let element = match line.get(76..78).map(str::trim) {
        Some(symbol) if !symbol.is_empty() => symbol.to_owned(),
        // guess from the atom name
        _ => line
            .get(12..16)
            .and_then(|name| name.trim().chars().find(|c| c.is_ascii_alphabetic()))
            .map(|c| c.to_ascii_uppercase().to_string())
            .unwrap_or_default(),
    };

    Ok(Atom { location, element })
}

/// Read the bead chain and its per frame centers of mass
pub fn read_structure<P: AsRef<Path>>(path: P) -> Result<Chain, IoError> {
    Ok(PdbReader::from_path(path)?.read()?.into_chain())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use chrom_core::PointTrait;

    use super::*;

    fn assert_close(a: &Point3, b: [f64; 3]) {
        assert!(a.coords().iter().zip(b).all(|(a, b)| (a - b).abs() < 1e-12));
    }

    fn atom(serial: usize, name: &str, xyz: [f64; 3], element: &str) -> String {
        format!(
            "ATOM  {serial:>5} {name:<4} BEA A{serial:>4}    {:>8.3}{:>8.3}{:>8.3}  1.00  0.00          {element:>2}",
            xyz[0], xyz[1], xyz[2]
        )
    }

    #[test]
    fn single_model() {
        let pdb = [
            "HEADER    TEST".to_string(),
            atom(1, "C", [0., 0., 0.], "C"),
            atom(2, "C", [10., 0., 0.], "C"),
            atom(3, "C", [20., 0., 0.], "C"),
            "END".to_string(),
        ]
        .join("\n");

        let structure = PdbReader::new(Cursor::new(pdb)).read().unwrap();

        assert_eq!(structure.frames.len(), 1);
        assert_eq!(
            structure.beads(),
            vec![
                Point3::from([0., 0., 0.]),
                Point3::from([1., 0., 0.]),
                Point3::from([2., 0., 0.]),
            ]
        );
        let centers = structure.centers();
        assert_eq!(centers.len(), 1);
        assert_close(&centers[0], [1., 0., 0.]);
    }

    #[test]
    fn models_are_frames() {
        let pdb = [
            "MODEL        1".to_string(),
            atom(1, "C", [0., 0., 0.], "C"),
            atom(2, "C", [20., 0., 0.], "C"),
            "ENDMDL".to_string(),
            "MODEL        2".to_string(),
            atom(1, "C", [0., 40., 0.], "C"),
            atom(2, "C", [0., 60., 0.], "C"),
            "ENDMDL".to_string(),
            "END".to_string(),
        ]
        .join("\n");

        let chain = PdbReader::new(Cursor::new(pdb)).read().unwrap().into_chain();

        assert_eq!(chain.beads().len(), 4);
        assert_eq!(chain.centers().len(), 2);
        assert_close(&chain.centers()[0], [1., 0., 0.]);
        assert_close(&chain.centers()[1], [0., 5., 0.]);
    }

    #[test]
    fn mass_weighted_center() {
        let pdb = [
            atom(1, "H1", [0., 0., 0.], ""),
            atom(2, "P", [10., 0., 0.], "P"),
        ]
        .join("\n");

        let structure = PdbReader::new(Cursor::new(pdb)).read().unwrap();
        let atoms = &structure.frames[0].atoms;
        assert_eq!(atoms[0].element, "H");
        assert_eq!(atoms[1].element, "P");

        let expected = 30.974 / (30.974 + 1.008);
        assert_close(&structure.centers()[0], [expected, 0., 0.]);
    }

    #[test]
    fn invalid_coordinate() {
        let pdb = "ATOM      1 C    BEA A   1       1.000   abc     0.000";

        assert!(matches!(
            PdbReader::new(Cursor::new(pdb)).read(),
            Err(IoError::Pdb { line: 1, .. })
        ));
        assert!(matches!(
            PdbReader::new(Cursor::new("ATOM      1 C")).read(),
            Err(IoError::Pdb { line: 1, .. })
        ));
    }

    #[test]
    fn empty() {
        assert!(matches!(
            PdbReader::new(Cursor::new("HEADER\nEND\n")).read(),
            Err(IoError::EmptyStructure)
        ));
    }

    #[test]
    fn masses() {
        assert_eq!(atomic_mass("c"), 12.011);
        assert_eq!(atomic_mass("XX"), 1.);
    }
}
