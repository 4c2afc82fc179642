//! Magic layouts and extracted netlists of a few small cells.

pub const AND2: &str = r#"magic
tech scmos
timestamp 1700000000
<< nwell >>
rect 0 250 132 500
<< metal1 >>
rect 0 0 132 40
rect 0 460 132 500
<< labels >>
rlabel metal1 0 0 0 0 1 GND!
rlabel metal1 0 500 0 500 5 Vdd!
rlabel metal2 33 100 33 100 1 A
rlabel metal2 66 100 66 100 1 B
rlabel metal2 99 100 99 100 1 Y
rlabel metal2 99 300 99 300 1 Y
rlabel metal1 33 0 33 0 1 Scan
rlabel metal1 33 500 33 500 5 ScanReturn
rlabel metal1 66 0 66 0 1 Test
rlabel metal1 66 500 66 500 5 Test
rlabel metal1 99 0 99 0 1 Clock
rlabel metal1 99 500 99 500 5 nReset
<< end >>
"#;

pub const AND2_SPICE: &str = r#"* SPICE3 file created from and2.ext - technology: scmos
.option scale=0.02u

.subckt and2 A B Y Vdd GND
M1000 a_6_40# A Vdd Vdd pfet w=12 l=2
M1001 a_6_40# B Vdd Vdd pfet w=12 l=2
M1002 a_6_40# A a_9_6# GND nfet w=12 l=2
M1003 a_9_6# B GND GND nfet w=12 l=2
M1004 Y a_6_40# Vdd Vdd pfet w=12 l=2
M1005 Y a_6_40# GND GND nfet w=6 l=2
C0 Y GND 2.1fF
C1 A GND 0.9fF
C2 B GND 0.8fF
C3 Vdd GND 5.5fF
.ends
"#;

pub const HALFADDER: &str = r#"magic
tech scmos
timestamp 1700000000
<< metal1 >>
rect 0 0 198 40
rect 0 460 198 500
<< labels >>
rlabel metal1 0 0 0 0 1 GND!
rlabel metal1 0 500 0 500 5 Vdd!
rlabel metal2 33 200 33 200 1 A
rlabel metal2 66 200 66 200 1 B
rlabel metal2 132 200 132 200 1 S
rlabel metal2 165 200 165 200 1 C
rlabel metal1 33 0 33 0 1 Scan
rlabel metal1 66 500 66 500 5 ScanReturn
<< end >>
"#;

pub const HALFADDER_SPICE: &str = r#"* SPICE3 file created from halfadder.ext - technology: scmos
.subckt halfadder A B S C Vdd GND
M1000 S A Vdd Vdd pfet w=12 l=2
M1001 C B GND GND nfet w=12 l=2
C0 A GND 1.5fF
.ends
"#;

/// An inverter two microns taller than the other cells.
pub const TALL_INV: &str = r#"magic
tech scmos
timestamp 1700000000
<< metal1 >>
rect 0 0 66 40
rect 0 560 66 600
<< labels >>
rlabel metal1 0 0 0 0 1 GND!
rlabel metal1 0 600 0 600 5 Vdd!
rlabel metal2 0 300 0 300 1 A
rlabel metal2 66 300 66 300 1 Y
<< end >>
"#;

pub const INV_SPICE: &str = r#"* SPICE3 file created from inv.ext - technology: scmos
.subckt inv A Y Vdd GND
M1000 Y A Vdd Vdd pfet w=12 l=2
M1001 Y A GND GND nfet w=6 l=2
.ends
"#;

/// An and2 whose Y label on the bottom edge is off the placement grid.
pub const MISALIGNED_AND2: &str = r#"magic
tech scmos
<< metal1 >>
rect 0 0 132 500
<< labels >>
rlabel metal1 0 0 0 0 1 GND!
rlabel metal1 0 500 0 500 5 Vdd!
rlabel metal2 33 100 33 100 1 A
rlabel metal2 66 100 66 100 1 B
rlabel metal2 104 0 104 0 1 Y
<< end >>
"#;
