//! # 空间群 -> Bravais 格子解析
//!
//! 由空间群编号确定晶系与格子中心化类型，进而得到求解器使用的 Bravais 格子名称，
//! 以及该格子所需的最小晶格参数集合。
//!
//! ## 依赖关系
//! - 被 `lattice/mod.rs`, `models/crystal.rs`, `transform/supercell.rs` 使用
//! - 使用 `models/crystal.rs` 中的 `LatticeKey`

use crate::error::{QdeckError, Result};
use crate::models::crystal::LatticeKey;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 七大晶系
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrystalSystem {
    Triclinic,
    Monoclinic,
    Orthorhombic,
    Tetragonal,
    Trigonal,
    Hexagonal,
    Cubic,
}

impl CrystalSystem {
    /// 按空间群编号区间划分晶系
    pub fn from_space_group(number: u32) -> Result<Self> {
        match number {
            1..=2 => Ok(CrystalSystem::Triclinic),
            3..=15 => Ok(CrystalSystem::Monoclinic),
            16..=74 => Ok(CrystalSystem::Orthorhombic),
            75..=142 => Ok(CrystalSystem::Tetragonal),
            143..=167 => Ok(CrystalSystem::Trigonal),
            168..=194 => Ok(CrystalSystem::Hexagonal),
            195..=230 => Ok(CrystalSystem::Cubic),
            _ => Err(QdeckError::InvalidSpaceGroup(number)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CrystalSystem::Triclinic => "triclinic",
            CrystalSystem::Monoclinic => "monoclinic",
            CrystalSystem::Orthorhombic => "orthorhombic",
            CrystalSystem::Tetragonal => "tetragonal",
            CrystalSystem::Trigonal => "trigonal",
            CrystalSystem::Hexagonal => "hexagonal",
            CrystalSystem::Cubic => "cubic",
        }
    }
}

impl fmt::Display for CrystalSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 格子中心化类型（国际符号首字母）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Centring {
    P,
    I,
    F,
    A,
    B,
    C,
    R,
}

impl Centring {
    fn from_letter(letter: u8) -> Self {
        match letter {
            b'I' => Centring::I,
            b'F' => Centring::F,
            b'A' => Centring::A,
            b'B' => Centring::B,
            b'C' => Centring::C,
            b'R' => Centring::R,
            _ => Centring::P,
        }
    }

    pub fn letter(&self) -> char {
        match self {
            Centring::P => 'P',
            Centring::I => 'I',
            Centring::F => 'F',
            Centring::A => 'A',
            Centring::B => 'B',
            Centring::C => 'C',
            Centring::R => 'R',
        }
    }

    /// 查表得到空间群的中心化类型
    pub fn from_space_group(number: u32) -> Result<Self> {
        if !(1..=230).contains(&number) {
            return Err(QdeckError::InvalidSpaceGroup(number));
        }
        Ok(Centring::from_letter(LATTICE_CENTRING[(number - 1) as usize]))
    }
}

// 第 n 个字节对应空间群 n + 1，数据来自 spglib 的 international_short 首字母
const LATTICE_CENTRING: &[u8; 230] = b"PPPPCPPCCP\
PCPPCPPPPB\
BFIIPPPPPP\
PPPPBBBAAA\
AFFIIIPPPP\
PPPPPPPPPP\
PPBBBBBBFF\
IIIIPPPPII\
PIPPPPIIPP\
PPPPPPIIPP\
PPPPPPIIII\
PPPPPPPPII\
IIPPPPPPPP\
PPPPPPPPII\
IIPPPRPRPP\
PPPPRPPPPR\
RPPPPRRPPP\
PPPPPPPPPP\
PPPPPPPPPP\
PPPPPFIPIP\
PFFIPIPPFF\
IPPIPFIPFI\
PPPPFFFFII";

/// 求解器接受的 Bravais 格子名称
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bravais {
    Cubic,
    Bcc,
    Fcc,
    Tetragonal,
    BodyCentredTetragonal,
    Hexagonal,
    Rhombohedral,
    Orthorhombic,
    BodyCentredOrthorhombic,
    BaseCentredOrthorhombic,
    FaceCentredOrthorhombic,
    Monoclinic,
    BaseCentredMonoclinic,
    Triclinic,
}

impl Bravais {
    pub const ALL: [Bravais; 14] = [
        Bravais::Cubic,
        Bravais::Bcc,
        Bravais::Fcc,
        Bravais::Tetragonal,
        Bravais::BodyCentredTetragonal,
        Bravais::Hexagonal,
        Bravais::Rhombohedral,
        Bravais::Orthorhombic,
        Bravais::BodyCentredOrthorhombic,
        Bravais::BaseCentredOrthorhombic,
        Bravais::FaceCentredOrthorhombic,
        Bravais::Monoclinic,
        Bravais::BaseCentredMonoclinic,
        Bravais::Triclinic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Bravais::Cubic => "cubic",
            Bravais::Bcc => "bcc",
            Bravais::Fcc => "fcc",
            Bravais::Tetragonal => "tetragonal",
            Bravais::BodyCentredTetragonal => "body_centred_tetragonal",
            Bravais::Hexagonal => "hexagonal",
            Bravais::Rhombohedral => "rhombohedral",
            Bravais::Orthorhombic => "orthorhombic",
            Bravais::BodyCentredOrthorhombic => "body_centred_orthorhombic",
            Bravais::BaseCentredOrthorhombic => "base_centred_orthorhombic",
            Bravais::FaceCentredOrthorhombic => "face_centred_orthorhombic",
            Bravais::Monoclinic => "monoclinic",
            Bravais::BaseCentredMonoclinic => "base_centred_monoclinic",
            Bravais::Triclinic => "triclinic",
        }
    }

    /// 该格子所需的晶格参数（按 a, b, c, alpha, beta, gamma 顺序）
    pub fn required_parameters(&self) -> &'static [LatticeKey] {
        use LatticeKey::*;

        match self {
            Bravais::Cubic | Bravais::Bcc | Bravais::Fcc => &[A],
            Bravais::Tetragonal | Bravais::BodyCentredTetragonal | Bravais::Hexagonal => &[A, C],
            Bravais::Rhombohedral => &[A, Alpha],
            Bravais::Orthorhombic
            | Bravais::BodyCentredOrthorhombic
            | Bravais::BaseCentredOrthorhombic
            | Bravais::FaceCentredOrthorhombic => &[A, B, C],
            Bravais::Monoclinic | Bravais::BaseCentredMonoclinic => &[A, B, C, Alpha],
            Bravais::Triclinic => &[A, B, C, Alpha, Beta, Gamma],
        }
    }
}

impl fmt::Display for Bravais {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Bravais {
    type Err = QdeckError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_lowercase();
        Bravais::ALL
            .iter()
            .copied()
            .find(|b| b.as_str() == name)
            .ok_or_else(|| QdeckError::UnknownBravais(s.to_string()))
    }
}

/// 由空间群编号得到 Bravais 格子
///
/// - P 中心化直接使用晶系名称
/// - 立方 I/F 使用缩写 `bcc`/`fcc`
/// - 三方晶系 R 中心化为 `rhombohedral`，P 中心化属于六方格子
/// - 其余为 `{centring}_{crystal_system}`
pub fn resolve_bravais(space_group_number: u32) -> Result<Bravais> {
    let system = CrystalSystem::from_space_group(space_group_number)?;
    let centring = Centring::from_space_group(space_group_number)?;

    let bravais = match (system, centring) {
        (CrystalSystem::Triclinic, Centring::P) => Bravais::Triclinic,
        (CrystalSystem::Monoclinic, Centring::P) => Bravais::Monoclinic,
        (CrystalSystem::Monoclinic, Centring::A | Centring::B | Centring::C) => {
            Bravais::BaseCentredMonoclinic
        }
        (CrystalSystem::Orthorhombic, Centring::P) => Bravais::Orthorhombic,
        (CrystalSystem::Orthorhombic, Centring::I) => Bravais::BodyCentredOrthorhombic,
        (CrystalSystem::Orthorhombic, Centring::F) => Bravais::FaceCentredOrthorhombic,
        (CrystalSystem::Orthorhombic, Centring::A | Centring::B | Centring::C) => {
            Bravais::BaseCentredOrthorhombic
        }
        (CrystalSystem::Tetragonal, Centring::P) => Bravais::Tetragonal,
        (CrystalSystem::Tetragonal, Centring::I) => Bravais::BodyCentredTetragonal,
        (CrystalSystem::Trigonal, Centring::R) => Bravais::Rhombohedral,
        (CrystalSystem::Trigonal, Centring::P) => Bravais::Hexagonal,
        (CrystalSystem::Hexagonal, Centring::P) => Bravais::Hexagonal,
        (CrystalSystem::Cubic, Centring::P) => Bravais::Cubic,
        (CrystalSystem::Cubic, Centring::I) => Bravais::Bcc,
        (CrystalSystem::Cubic, Centring::F) => Bravais::Fcc,
        (system, centring) => {
            return Err(QdeckError::UnknownBravais(format!(
                "{}-centred {} (space group {})",
                centring.letter(),
                system,
                space_group_number
            )))
        }
    };

    Ok(bravais)
}

#[cfg(test)]
mod tests {
    use super::*;
    use LatticeKey::*;

    #[test]
    fn test_crystal_system_ranges() {
        assert_eq!(CrystalSystem::from_space_group(1).unwrap(), CrystalSystem::Triclinic);
        assert_eq!(CrystalSystem::from_space_group(15).unwrap(), CrystalSystem::Monoclinic);
        assert_eq!(CrystalSystem::from_space_group(16).unwrap(), CrystalSystem::Orthorhombic);
        assert_eq!(CrystalSystem::from_space_group(142).unwrap(), CrystalSystem::Tetragonal);
        assert_eq!(CrystalSystem::from_space_group(143).unwrap(), CrystalSystem::Trigonal);
        assert_eq!(CrystalSystem::from_space_group(194).unwrap(), CrystalSystem::Hexagonal);
        assert_eq!(CrystalSystem::from_space_group(230).unwrap(), CrystalSystem::Cubic);
    }

    #[test]
    fn test_out_of_range_space_group() {
        assert!(matches!(resolve_bravais(0), Err(QdeckError::InvalidSpaceGroup(0))));
        assert!(matches!(resolve_bravais(231), Err(QdeckError::InvalidSpaceGroup(231))));
    }

    #[test]
    fn test_known_space_groups() {
        assert_eq!(resolve_bravais(227).unwrap(), Bravais::Fcc); // Si, diamond
        assert_eq!(resolve_bravais(225).unwrap(), Bravais::Fcc); // NaCl
        assert_eq!(resolve_bravais(229).unwrap(), Bravais::Bcc); // W
        assert_eq!(resolve_bravais(221).unwrap(), Bravais::Cubic);
        assert_eq!(resolve_bravais(136).unwrap(), Bravais::Tetragonal); // rutile
        assert_eq!(resolve_bravais(141).unwrap(), Bravais::BodyCentredTetragonal); // anatase
        assert_eq!(resolve_bravais(166).unwrap(), Bravais::Rhombohedral);
        assert_eq!(resolve_bravais(164).unwrap(), Bravais::Hexagonal);
        assert_eq!(resolve_bravais(194).unwrap(), Bravais::Hexagonal);
        assert_eq!(resolve_bravais(62).unwrap(), Bravais::Orthorhombic);
        assert_eq!(resolve_bravais(63).unwrap(), Bravais::BaseCentredOrthorhombic);
        assert_eq!(resolve_bravais(38).unwrap(), Bravais::BaseCentredOrthorhombic);
        assert_eq!(resolve_bravais(69).unwrap(), Bravais::FaceCentredOrthorhombic);
        assert_eq!(resolve_bravais(71).unwrap(), Bravais::BodyCentredOrthorhombic);
        assert_eq!(resolve_bravais(14).unwrap(), Bravais::Monoclinic);
        assert_eq!(resolve_bravais(12).unwrap(), Bravais::BaseCentredMonoclinic);
        assert_eq!(resolve_bravais(2).unwrap(), Bravais::Triclinic);
    }

    #[test]
    fn test_every_space_group_resolves_to_exact_parameter_set() {
        for number in 1..=230 {
            let bravais = resolve_bravais(number).unwrap();
            let expected: &[LatticeKey] = match bravais {
                Bravais::Cubic | Bravais::Bcc | Bravais::Fcc => &[A],
                Bravais::Tetragonal | Bravais::BodyCentredTetragonal | Bravais::Hexagonal => {
                    &[A, C]
                }
                Bravais::Rhombohedral => &[A, Alpha],
                Bravais::Orthorhombic
                | Bravais::BodyCentredOrthorhombic
                | Bravais::BaseCentredOrthorhombic
                | Bravais::FaceCentredOrthorhombic => &[A, B, C],
                Bravais::Monoclinic | Bravais::BaseCentredMonoclinic => &[A, B, C, Alpha],
                Bravais::Triclinic => &[A, B, C, Alpha, Beta, Gamma],
            };
            assert_eq!(bravais.required_parameters(), expected, "space group {}", number);
        }
    }

    #[test]
    fn test_bravais_name_round_trip() {
        for bravais in Bravais::ALL {
            assert_eq!(bravais.as_str().parse::<Bravais>().unwrap(), bravais);
        }
        assert!(matches!(
            "simple_cubic".parse::<Bravais>(),
            Err(QdeckError::UnknownBravais(_))
        ));
    }

    #[test]
    fn test_centring_table_letters() {
        assert_eq!(Centring::from_space_group(5).unwrap(), Centring::C);
        assert_eq!(Centring::from_space_group(146).unwrap(), Centring::R);
        assert_eq!(Centring::from_space_group(196).unwrap(), Centring::F);
        assert_eq!(Centring::from_space_group(197).unwrap(), Centring::I);
    }
}
