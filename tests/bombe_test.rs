//! Cribs enciphered with a known key, searched for with the bombe.

use bombe::alphabet::letters_of;
use bombe::{Bombe, Enigma, Menu, ReflectorModel, RotorCount, RotorModel, Stop};

const BARBAROSSA_PLAIN: &str = "AUFKLXABTEILUNGXVONXKURTI";
const BARBAROSSA_CIPHER: &str = "EDPUDNRGYSZRCXNUYTPOMRMBO";

fn barbarossa_stop() -> Stop {
    Stop {
        reflector: ReflectorModel::RegularB,
        rotors: vec![RotorModel::II, RotorModel::IV, RotorModel::V],
        positions: letters_of("ARQ").unwrap(),
        stecker: [20, 5],
    }
}

#[test]
fn crib_is_a_real_message() {
    let mut enigma = Enigma::new(
        ReflectorModel::RegularB,
        &[RotorModel::II, RotorModel::IV, RotorModel::V],
    )
    .unwrap();
    enigma.configure_steckers("AV:BS:CG:DL:FU:HZ:IN:KM:OW:RX").unwrap();
    enigma.configure_rotors("BUL", "BLA").unwrap();
    assert_eq!(enigma.encrypt(BARBAROSSA_PLAIN).unwrap(), BARBAROSSA_CIPHER);
}

#[test]
fn finds_the_key_of_a_three_rotor_crib() {
    let menu = Menu::from_crib(RotorCount::Three, BARBAROSSA_PLAIN, BARBAROSSA_CIPHER)
        .unwrap()
        .with_registers(vec![(20, 5)])
        .unwrap();

    let mut bombe = Bombe::new(
        &menu,
        ReflectorModel::RegularB,
        &[RotorModel::II, RotorModel::IV, RotorModel::V],
    )
    .unwrap();
    assert_eq!(bombe.run(), &[barbarossa_stop()]);
    assert_eq!(bombe.tests(), 26 * 26 * 26);
    assert_eq!(bombe.stops()[0].to_string(), "1 2 4 5    ARQ U:F");
}

#[test]
fn unsteckered_hypothesis_finds_the_partner() {
    // U is the most connected letter, tested against itself
    let menu = Menu::from_crib(RotorCount::Three, BARBAROSSA_PLAIN, BARBAROSSA_CIPHER).unwrap();
    assert_eq!(menu.registers(), &[(20, 20)]);

    let mut bombe = Bombe::new(
        &menu,
        ReflectorModel::RegularB,
        &[RotorModel::II, RotorModel::IV, RotorModel::V],
    )
    .unwrap();
    assert_eq!(bombe.run(), &[barbarossa_stop()]);
}

#[test]
fn wrong_wheel_orders_do_not_stop() {
    let menu = Menu::from_crib(RotorCount::Three, BARBAROSSA_PLAIN, BARBAROSSA_CIPHER)
        .unwrap()
        .with_registers(vec![(20, 5)])
        .unwrap();

    for rotors in &[
        [RotorModel::I, RotorModel::II, RotorModel::III],
        [RotorModel::V, RotorModel::IV, RotorModel::II],
    ] {
        let mut bombe = Bombe::new(&menu, ReflectorModel::RegularB, rotors).unwrap();
        assert!(bombe.run().is_empty(), "stops for {:?}", rotors);
    }
}

#[test]
fn menu_file_matches_crib() {
    let menu = Menu::from_crib(RotorCount::Three, BARBAROSSA_PLAIN, BARBAROSSA_CIPHER)
        .unwrap()
        .with_registers(vec![(20, 5)])
        .unwrap();
    let text = menu.to_string();
    assert!(text.starts_with("AAAAE\nAABUD\n"));
    assert!(text.ends_with("AAYIO\n=U:F\n"));
    assert_eq!(Menu::parse(&text).unwrap(), menu);
}

#[test]
fn finds_the_key_of_a_four_rotor_crib() {
    let plain = "VONVONJLOOKSJHFFTTTEINSEI";
    let rotors = [RotorModel::Beta, RotorModel::II, RotorModel::IV, RotorModel::I];

    let mut enigma = Enigma::new(ReflectorModel::ThinB, &rotors).unwrap();
    enigma.configure_steckers("AT:BL:DF:GJ:HM:NW:OP:QY:RZ:VX").unwrap();
    enigma.configure_rotors("AAAA", "VJNR").unwrap();
    let cipher = enigma.encrypt(plain).unwrap();
    assert_eq!(cipher, "FSPDMTESBCTBSFEQDDUIVFHIE");

    // E and T both take part in five edges, the tie goes to E
    let menu = Menu::from_crib(RotorCount::Four, plain, &cipher).unwrap();
    assert_eq!(menu.registers(), &[(4, 4)]);

    // E is unsteckered, so only the E wire of E stays live
    let mut bombe = Bombe::new(&menu, ReflectorModel::ThinB, &rotors).unwrap();
    assert!(bombe.run().contains(&Stop {
        reflector: ReflectorModel::ThinB,
        rotors: rotors.to_vec(),
        positions: letters_of("VJNS").unwrap(),
        stecker: [4, 4],
    }));
    assert_eq!(bombe.tests(), 26 * 26 * 26 * 26);

    // T is steckered to A, so all wires of T but A stay live
    let t_menu = menu.clone().with_registers(vec![(19, 19)]).unwrap();
    let mut bombe = Bombe::new(&t_menu, ReflectorModel::ThinB, &rotors).unwrap();
    assert!(bombe.run().contains(&Stop {
        reflector: ReflectorModel::ThinB,
        rotors: rotors.to_vec(),
        positions: letters_of("VJNS").unwrap(),
        stecker: [19, 0],
    }));
}
