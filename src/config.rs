//! Crib files.
//!
//! ```json
//! { "plain": "AUFKLXABTE", "cipher": "EDPUDNRGYS", "rotors": 3, "register": "U:F" }
//! ```

use crate::alphabet::letter_of;
use crate::error::{BombeError, Result};
use crate::menu::Menu;
use crate::scrambler::RotorCount;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

fn default_rotors() -> usize {
    3
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawCrib {
    pub plain: String,
    pub cipher: String,
    #[serde(default = "default_rotors")]
    pub rotors: usize,
    pub register: Option<String>,
}

impl RawCrib {
    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        serde_json::from_reader(reader)
            .map_err(|e| BombeError::InvalidInput(format!("crib file: {}", e)))
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            BombeError::InvalidInput(format!("cannot open {}: {}", path.display(), e))
        })?;
        RawCrib::from_reader(BufReader::new(file))
    }
}

impl TryFrom<RawCrib> for Menu {
    type Error = BombeError;

    fn try_from(raw: RawCrib) -> Result<Menu> {
        let menu = Menu::from_crib(RotorCount::try_from(raw.rotors)?, &raw.plain, &raw.cipher)?;

        match raw.register {
            None => Ok(menu),
            Some(register) => {
                let letters: Vec<char> = register.chars().filter(|&c| c != ':').collect();
                if letters.len() != 2 {
                    return Err(BombeError::InvalidInput(format!(
                        "register {:?} is not a letter pair",
                        register
                    )));
                }
                let pair = (letter_of(letters[0])?, letter_of(letters[1])?);
                menu.with_registers(vec![pair])
            }
        }
    }
}
