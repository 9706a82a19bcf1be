mod common;

use std::time::Duration;

use vphy_core::chan::CcchMode;
use vphy_core::{dbm2rxlev, Arfcn, MsgBuf};
use vphy_l1::medium::MediumEvent;
use vphy_pdus::l1ctl::header::L1ctlHdr;
use vphy_pdus::l1ctl::pdus::pm_req::{PmConfEntry, PmReq, PM_CONF_ENTRY_LEN, PM_KIND_RANGE};
use vphy_pdus::{L1ctlMsg, L1ctlMsgType, L1CTL_F_DONE};

use common::{recv_msg, send_frame, test_config, EngineTest};

fn pm_req_frame(from: u16, to: u16) -> Vec<u8> {
    let mut msg = L1ctlMsg::new(L1ctlMsgType::PmReq);
    PmReq { kind: PM_KIND_RANGE, band_arfcn_from: from, band_arfcn_to: to }
        .to_msgbuf(msg.buf_mut());
    msg.finish()
}

fn parse_pm_conf(payload: &[u8]) -> (u8, Vec<PmConfEntry>) {
    let mut rd = MsgBuf::from_bytes(payload);
    let hdr = L1ctlHdr::from_msgbuf(&mut rd).unwrap();
    assert_eq!(hdr.msg_type, L1ctlMsgType::PmConf);
    let mut entries = Vec::new();
    while rd.remaining() >= PM_CONF_ENTRY_LEN {
        entries.push(PmConfEntry::from_msgbuf(&mut rd).unwrap());
    }
    assert_eq!(rd.remaining(), 0, "trailing bytes in pm conf");
    (hdr.flags, entries)
}

#[test]
fn test_single_arfcn_scenario() {
    // ARFCN 100, reduction 10 dBm, raw level -60 dBm => level -70 dBm
    let mut test = EngineTest::new(test_config("pm_single", CcchMode::NonCombined, 0));
    let mut client = test.connect();

    test.engine.state_mut().pm.set_reduction(Arfcn::new(100), 10);
    test.medium_tx
        .send(MediumEvent { band_arfcn: 100, sig_lev_dbm: -60, frame_nr: 2000, burst: vec![0x2B] })
        .unwrap();
    test.run_frames(1);

    assert_eq!(test.engine.state().pm.level_dbm(Arfcn::new(100)), -70);
    // The medium event also refreshed the downlink time
    assert_eq!(test.engine.state().downlink_time().frame_number(), 2000);

    send_frame(&mut client, &pm_req_frame(100, 100));
    test.run_frames(1);

    let (flags, entries) = parse_pm_conf(&recv_msg(&mut client));
    assert_eq!(flags & L1CTL_F_DONE, L1CTL_F_DONE);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].band_arfcn, 100);
    assert_eq!(entries[0].rxlev, [dbm2rxlev(-70); 2]);
}

#[test]
fn test_chunked_range_query() {
    let mut test = EngineTest::new(test_config("pm_chunk", CcchMode::NonCombined, 0));
    let mut client = test.connect();

    send_frame(&mut client, &pm_req_frame(0, 149));
    test.run_frames(1);

    // 150 entries at 4 bytes with a 63-entry message bound: 3 messages
    let mut frames = Vec::new();
    for _ in 0..3 {
        frames.push(recv_msg(&mut client));
    }

    let mut all = Vec::new();
    for (i, payload) in frames.iter().enumerate() {
        let (flags, entries) = parse_pm_conf(payload);
        assert_eq!(
            flags & L1CTL_F_DONE != 0,
            i == frames.len() - 1,
            "done flag wrong on message {}",
            i
        );
        all.extend(entries);
    }

    // Concatenated entries cover the range exactly once, ascending
    let arfcns: Vec<u16> = all.iter().map(|e| e.band_arfcn).collect();
    let expected: Vec<u16> = (0..=149).collect();
    assert_eq!(arfcns, expected);
}

#[test]
fn test_unheard_carriers_report_rxlev_zero() {
    let mut test = EngineTest::new(test_config("pm_unheard", CcchMode::NonCombined, 0));
    let mut client = test.connect();

    send_frame(&mut client, &pm_req_frame(500, 510));
    test.run_frames(1);

    let (flags, entries) = parse_pm_conf(&recv_msg(&mut client));
    assert_eq!(flags & L1CTL_F_DONE, L1CTL_F_DONE);
    assert_eq!(entries.len(), 11);
    for entry in entries {
        assert_eq!(entry.rxlev, [0, 0]);
    }
}

#[test]
fn test_decay_end_to_end() {
    let mut test = EngineTest::new(test_config("pm_decay", CcchMode::NonCombined, 1));
    let mut client = test.connect();

    test.medium_tx
        .send(MediumEvent { band_arfcn: 42, sig_lev_dbm: -60, frame_nr: 100, burst: vec![] })
        .unwrap();
    test.run_frames(1);
    assert_eq!(test.engine.state().pm.level_dbm(Arfcn::new(42)), -60);

    // Nothing further heard on the carrier within the 1 ms timeout
    std::thread::sleep(Duration::from_millis(10));
    test.run_frames(1);

    send_frame(&mut client, &pm_req_frame(42, 42));
    test.run_frames(1);

    let (_, entries) = parse_pm_conf(&recv_msg(&mut client));
    assert_eq!(entries[0].rxlev, [0, 0]);
}

#[test]
fn test_flag_bits_do_not_leak_into_lookup() {
    let mut test = EngineTest::new(test_config("pm_flags", CcchMode::NonCombined, 0));
    let mut client = test.connect();

    // Burst reported with the PCS flag set; the table entry is plain 100
    test.medium_tx
        .send(MediumEvent {
            band_arfcn: 100 | 0x8000,
            sig_lev_dbm: -65,
            frame_nr: 10,
            burst: vec![],
        })
        .unwrap();
    test.run_frames(1);

    // Query with the uplink flag set; the response echoes the raw value but
    // reads the same masked entry
    send_frame(&mut client, &pm_req_frame(100 | 0x4000, 100 | 0x4000));
    test.run_frames(1);

    let (_, entries) = parse_pm_conf(&recv_msg(&mut client));
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].band_arfcn, 100 | 0x4000);
    assert_eq!(entries[0].rxlev, [dbm2rxlev(-65); 2]);
}
