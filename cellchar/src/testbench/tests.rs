use tempdir::TempDir;

use super::*;
use crate::geometry::Coordinate;

const NAND2: &str = r#"* SPICE3 file created from nand2.ext - technology: scmos
.subckt nand2 A B Y Vdd GND Scan
M1000 Y A Vdd Vdd pfet w=12 l=2
M1001 Y B Vdd Vdd pfet w=12 l=2
M1002 a_9_6# A GND GND nfet w=12 l=2
M1003 Y B a_9_6# GND nfet w=12 l=2
C0 A GND 1.17fF
.ends
"#;

fn port(name: &str, direction: Direction) -> Port {
    Port::new(name, direction, Coordinate::new(0.0, 0.0))
}

fn nand2_ports() -> Vec<Port> {
    vec![
        port("A", Direction::Input),
        port("B", Direction::Input),
        port("Y", Direction::Output),
        port("GND!", Direction::Power),
        port("Vdd!", Direction::Power),
        port("Scan", Direction::NotConnected),
    ]
}

fn circuit() -> ExtractedCircuit {
    ExtractedCircuit::from_netlist("nand2", "/tmp/nand2.spice", NAND2).unwrap()
}

fn a_to_y() -> Pairing {
    Pairing {
        input: "A".into(),
        output: "Y".into(),
    }
}

#[test]
fn pairings_skip_self_named_outputs() {
    let ports = vec![
        port("Y", Direction::Input),
        port("Q", Direction::Output),
        port("Y", Direction::Output),
        port("Z", Direction::Output),
    ];
    let pairings = Pairing::for_input(&ports[0], &ports);
    assert_eq!(
        pairings,
        vec![
            Pairing {
                input: "Y".into(),
                output: "Q".into()
            },
            Pairing {
                input: "Y".into(),
                output: "Z".into()
            },
        ]
    );
}

#[test]
fn cells_without_outputs_have_no_pairings() {
    let ports = vec![port("A", Direction::Input), port("Low", Direction::Inout)];
    assert!(Pairing::for_input(&ports[0], &ports).is_empty());
}

#[test]
fn subcircuit_ports_map_to_testbench_nodes() {
    let ports = nand2_ports();
    let pairing = a_to_y();
    assert_eq!(node_for("A", &ports, &pairing), INPUT_NODE);
    assert_eq!(node_for("B", &ports, &pairing), BIAS_NODE);
    assert_eq!(node_for("Y", &ports, &pairing), OUTPUT_NODE);
    assert_eq!(node_for("Vdd", &ports, &pairing), SUPPLY_NODE);
    assert_eq!(node_for("GND", &ports, &pairing), GROUND_NODE);
    assert_eq!(node_for("Scan", &ports, &pairing), "float_Scan");
    assert_eq!(node_for("a_9_6#", &ports, &pairing), "float_a_9_6#");
}

#[test]
fn global_supply_nets_keep_their_nodes() {
    let ports = nand2_ports();
    let pairing = a_to_y();
    assert_eq!(node_for("Vdd!", &ports, &pairing), SUPPLY_NODE);
    assert_eq!(node_for("GND!", &ports, &pairing), GROUND_NODE);
}

#[test]
fn load_literals() {
    assert_eq!(load_literal(0.01), "10a");
    assert_eq!(load_literal(1.0), "1000a");
    assert_eq!(load_literal(50.0), "50000a");
}

#[test]
fn delay_deck() {
    let params = CharParams::default();
    let deck = synthesize(
        &circuit(),
        &nand2_ports(),
        &a_to_y(),
        Mode::DelaySweep { load: 10.0 },
        &params,
    )
    .unwrap();
    assert!(deck.starts_with("* delay sweep at 10 fF of nand2 for A -> Y"));
    assert!(deck.contains(".include '/tmp/nand2.spice'"));
    assert!(deck.contains("xdut in bias out vdd 0 float_Scan nand2"));
    assert!(deck.contains("cl out 0 10000a"));
    assert!(deck.contains(".measure tran trr trig v(in) val=0.9 rise=1"));
    assert!(deck.contains(".measure tran tff"));
    assert!(!deck.contains("optimize"));
    assert!(!deck.contains(".temp"));
}

#[test]
fn capacitance_fit_deck() {
    let params = CharParams::builder().temp(25.0).build().unwrap();
    let deck = synthesize(
        &circuit(),
        &nand2_ports(),
        &a_to_y(),
        Mode::CapacitanceFit,
        &params,
    )
    .unwrap();
    assert!(deck.contains(".temp 25"));
    assert!(deck.contains("rdut src in 10000"));
    assert!(deck.contains(".param cload=opt1(1000a, 10a, 100000a)"));
    assert!(deck.contains("sweep optimize=opt1 results=tdiff model=optmod"));
    assert!(deck.contains(".measure tran cfit param='cload'"));
}

#[test]
fn synthesis_is_deterministic() {
    let params = CharParams::default();
    let render = || {
        synthesize(
            &circuit(),
            &nand2_ports(),
            &a_to_y(),
            Mode::DelaySweep { load: 0.1 },
            &params,
        )
        .unwrap()
    };
    assert_eq!(render(), render());
}

#[test]
fn artifacts_are_removed_on_drop() {
    let parent = TempDir::new("cellchar_testbench").unwrap();
    let artifact = DeckArtifact::create(
        parent.path(),
        &a_to_y(),
        Mode::CapacitanceFit,
        "* empty deck\n.end\n",
    )
    .unwrap();
    let dir = artifact.dir().to_path_buf();
    assert!(artifact.deck().starts_with(parent.path()));
    assert_eq!(
        std::fs::read_to_string(artifact.deck()).unwrap(),
        "* empty deck\n.end\n"
    );

    let other = DeckArtifact::create(
        parent.path(),
        &a_to_y(),
        Mode::CapacitanceFit,
        "* empty deck\n.end\n",
    )
    .unwrap();
    assert_ne!(other.dir(), artifact.dir());

    drop(artifact);
    assert!(!dir.exists());
    assert!(other.dir().exists());
}
