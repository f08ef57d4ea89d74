use std::io::Cursor;
use std::time::{SystemTime, UNIX_EPOCH};

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use plaza_ranker::session::{NoticeLevel, RankingSession};
use plaza_ranker::types::CommuteRecord;
use plaza_ranker::EngineError;
use rust_xlsxwriter::Workbook;

const MUNICIPIOS: [&str; 10] = [
    "Donostia", "Abadiño", "Bergara", "Eibar", "Donostia", "Laudio", "Zarautz", "Durango",
    "Getxo", "Irun",
];

fn openings_xlsx() -> Vec<u8> {
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.write_string(0, 0, "CENTRO").unwrap();
    ws.write_string(0, 1, "MUNICIPIO").unwrap();
    for (i, municipio) in MUNICIPIOS.iter().enumerate() {
        let r = i as u32 + 1;
        ws.write_number(r, 0, 1000 + i as u32).unwrap();
        ws.write_string(r, 1, *municipio).unwrap();
    }
    wb.save_to_buffer().unwrap()
}

fn session_with_rows() -> RankingSession {
    let mut session = RankingSession::default();
    let ticket = session.select_city("bergara");
    let records = (0..10)
        .map(|i| CommuteRecord::new((1000 + i).to_string(), 10.0 + i as f64, 1000.0 * i as f64))
        .collect();
    session.finish_city_load(&ticket, records);
    session.upload("plazas.xlsx", &openings_xlsx());
    assert_eq!(session.rows().len(), 10);
    session.take_notices();
    session
}

#[test]
fn export_contains_exactly_the_ranked_rows_in_rank_order() {
    let mut session = session_with_rows();
    session.edit_rank(7, Some("3")).unwrap();
    session.edit_rank(2, Some("1")).unwrap();
    session.edit_rank(5, Some("2")).unwrap();

    let file = session.export().unwrap();
    assert_eq!(file.rows, 3);
    assert_eq!(session.take_notices()[0].level, NoticeLevel::Success);

    let mut wb = open_workbook_auto_from_rs(Cursor::new(file.bytes)).unwrap();
    let range = wb.worksheet_range("SelectedData").unwrap();
    assert_eq!(range.height(), 4);

    let header: Vec<String> = (0..range.width())
        .map(|c| range.get((0, c)).map(|d| d.to_string()).unwrap_or_default())
        .collect();
    assert_eq!(
        header,
        vec!["CENTRO", "MUNICIPIO", "Denbora", "Distantzia", "aukeratutakoOrdena"]
    );

    let exported: Vec<(Data, Data)> = (1..4)
        .map(|r| (range.get((r, 0)).unwrap().clone(), range.get((r, 4)).unwrap().clone()))
        .collect();
    assert_eq!(
        exported,
        vec![
            (Data::Float(1002.0), Data::String("1".to_string())),
            (Data::Float(1005.0), Data::String("2".to_string())),
            (Data::Float(1007.0), Data::String("3".to_string())),
        ]
    );
    assert_eq!(range.get((1, 2)), Some(&Data::Float(12.0)));
}

#[test]
fn export_follows_the_active_sort() {
    let mut session = session_with_rows();
    session.edit_rank(1, Some("1")).unwrap();
    session.edit_rank(3, Some("2")).unwrap();
    session
        .view_mut()
        .sort_by("MUNICIPIO", plaza_ranker::processing::SortOrder::Descending);

    let file = session.export().unwrap();
    let mut wb = open_workbook_auto_from_rs(Cursor::new(file.bytes)).unwrap();
    let range = wb.worksheet_range("SelectedData").unwrap();
    // Eibar before Abadiño
    assert_eq!(range.get((1, 1)), Some(&Data::String("Eibar".to_string())));
    assert_eq!(range.get((2, 1)), Some(&Data::String("Abadiño".to_string())));
}

#[test]
fn empty_selection_is_refused() {
    let mut session = session_with_rows();
    session.edit_rank(4, Some("1")).unwrap();
    session.edit_rank(4, Some("")).unwrap();

    assert!(matches!(session.export(), Err(EngineError::EmptySelection)));
    let notices = session.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Warning);
}

#[test]
fn selection_tracks_ranks_through_edits() {
    let mut session = session_with_rows();
    for (id, value) in [
        (0, Some("1")),
        (9, Some("2")),
        (0, None),
        (9, Some("")),
        (3, Some("7")),
        (3, Some("8")),
    ] {
        session.edit_rank(id, value).unwrap();
        assert!(session.store().is_consistent());
    }
    let selected: Vec<usize> = session.store().selection().iter().copied().collect();
    assert_eq!(selected, vec![0, 3]);
    assert!(matches!(
        session.edit_rank(42, Some("1")),
        Err(EngineError::UnknownRow { id: 42 })
    ));
}

#[test]
fn municipality_filter_is_a_case_insensitive_prefix_match() {
    let mut session = session_with_rows();
    session
        .view_mut()
        .set_filter("MUNICIPIO", vec!["don".to_string()]);

    let visible: Vec<String> = session
        .visible_rows()
        .iter()
        .filter_map(|r| r.get("MUNICIPIO").map(|v| v.to_string()))
        .collect();
    assert_eq!(visible, vec!["Donostia", "Donostia"]);

    let municipio = session
        .columns()
        .iter()
        .find(|c| c.name == "MUNICIPIO")
        .unwrap()
        .clone();
    assert_eq!(municipio.filter_options.unwrap().len(), 9);
}

#[test]
fn exported_file_can_be_saved() {
    let mut session = session_with_rows();
    session.edit_rank(0, Some("1")).unwrap();
    let file = session.export().unwrap();

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("plaza-ranker-export-{nanos}"));
    std::fs::create_dir_all(&dir).unwrap();

    let path = file.save_in(&dir).unwrap();
    assert!(path.ends_with("aukeratutako-plazak.xlsx"));
    assert_eq!(std::fs::read(&path).unwrap(), file.bytes);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn reuploaded_export_keeps_its_ranks() {
    let mut session = session_with_rows();
    session.edit_rank(7, Some("2")).unwrap();
    session.edit_rank(2, Some("1")).unwrap();
    let first = session.export().unwrap();

    session.upload(&first.file_name, &first.bytes);
    assert_eq!(session.rows().len(), 2);
    let ranks: Vec<Option<&str>> = session.rows().iter().map(|r| r.rank()).collect();
    assert_eq!(ranks, vec![Some("1"), Some("2")]);
    assert_eq!(session.rows()[0].get("aukeratutakoOrdena"), None);
    assert_eq!(session.rows()[0].duration(), Some(12.0));
    assert_eq!(session.store().selection().len(), 2);
    assert_eq!(
        session
            .columns()
            .iter()
            .filter(|c| c.name == "aukeratutakoOrdena")
            .count(),
        1
    );

    let second = session.export().unwrap();
    assert_eq!(second.rows, 2);
    let mut wb = open_workbook_auto_from_rs(Cursor::new(second.bytes)).unwrap();
    let range = wb.worksheet_range("SelectedData").unwrap();
    assert_eq!(range.get((1, 4)), Some(&Data::String("1".to_string())));
    assert_eq!(range.get((2, 4)), Some(&Data::String("2".to_string())));
    assert_eq!(range.get((2, 0)), Some(&Data::Float(1007.0)));
}

#[test]
fn zero_padded_csv_codes_join_their_dataset_codes() {
    let mut session = RankingSession::default();
    let ticket = session.select_city("laudio");
    session.finish_city_load(&ticket, vec![CommuteRecord::new("010012", 7.0, 4000.0)]);
    session.upload("plazas.csv", b"CENTRO,MUNICIPIO\n010012,Laudio\n");

    assert_eq!(session.rows()[0].duration(), Some(7.0));
    assert!(session.take_notices().is_empty());
}
