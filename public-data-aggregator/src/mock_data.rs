//! Canned per-source datasets served when live data is unavailable.

use crate::types::{FieldValue, Record, ResponseEnvelope};

fn record(fields: Vec<(&str, FieldValue)>) -> Record {
    fields
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

/// The canned envelope for `source_id`, or `None` if the source has none.
pub fn envelope_for(source_id: &str) -> Option<ResponseEnvelope> {
    let items = match source_id {
        "PARKING" => parking(),
        "LIBRARY" => library(),
        "PARK" => park(),
        "CULTURE" => culture(),
        _ => return None,
    };
    Some(ResponseEnvelope::from_items(items))
}

#[allow(clippy::too_many_arguments)]
fn parking_lot(
    seq: i64,
    open_slots: i64,
    name: &str,
    address: &str,
    spaces: i64,
    hours: &str,
    lon: &str,
    lat: &str,
    height_limit: &str,
    remarks: &str,
) -> Record {
    record(vec![
        ("순번", seq.into()),
        ("개방호수", open_slots.into()),
        ("주차장명", name.into()),
        ("지번주소", address.into()),
        ("면수", spaces.into()),
        ("개방시간", hours.into()),
        ("약정시작일", "2024-01-01".into()),
        ("약정종료일", "2024-12-31".into()),
        ("경도", lon.into()),
        ("위도", lat.into()),
        ("높이제한시설", height_limit.into()),
        ("비고", remarks.into()),
    ])
}

fn parking() -> Vec<Record> {
    vec![
        parking_lot(1, 20, "대구북구청 공용주차장(Demo)", "대구광역시 북구 칠성동2가 302-155", 50, "09:00~18:00", "128.5855", "35.8842", "2.1m", "공휴일 휴무"),
        parking_lot(2, 15, "칠성시장 공영주차장(Demo)", "대구광역시 북구 칠성동2가 151-8", 30, "24시간", "128.5901", "35.8798", "없음", "연중무휴"),
        parking_lot(3, 10, "북구문화회관 주차장(Demo)", "대구광역시 북구 산격동 1295", 40, "09:00~22:00", "128.5712", "35.8956", "2.3m", "문화행사 시 제한"),
        parking_lot(4, 25, "대구교육대학교 개방주차장(Demo)", "대구광역시 북구 태전동 219", 100, "18:00~08:00", "128.5634", "35.9067", "2.0m", "야간 개방"),
        parking_lot(5, 12, "침산공원 주차장(Demo)", "대구광역시 북구 침산동 산 180-1", 35, "06:00~22:00", "128.5478", "35.8723", "없음", "공원 이용시간 연동"),
    ]
}

fn library() -> Vec<Record> {
    vec![
        record(vec![
            ("순번", 1.into()),
            ("도서관명", "대구북구립도서관(Demo)".into()),
            ("주소", "대구광역시 북구 칠성동2가 123-45".into()),
            ("전화번호", "053-665-1234".into()),
            ("운영시간", "09:00~18:00".into()),
            ("휴관일", "매월 둘째, 넷째 월요일".into()),
            ("경도", "128.5823".into()),
            ("위도", "35.8867".into()),
        ]),
        record(vec![
            ("순번", 2.into()),
            ("도서관명", "칠성도서관(Demo)".into()),
            ("주소", "대구광역시 북구 칠성동1가 789-12".into()),
            ("전화번호", "053-665-5678".into()),
            ("운영시간", "09:00~22:00".into()),
            ("휴관일", "매월 첫째, 셋째 월요일".into()),
            ("경도", "128.5889".into()),
            ("위도", "35.8745".into()),
        ]),
    ]
}

fn park() -> Vec<Record> {
    vec![
        record(vec![
            ("순번", 1.into()),
            ("공원명", "침산공원(Demo)".into()),
            ("주소", "대구광역시 북구 침산동 산 180-1".into()),
            ("면적", "145,000㎡".into()),
            ("시설", "산책로, 체육시설, 놀이시설".into()),
            ("개방시간", "상시개방".into()),
            ("경도", "128.5478".into()),
            ("위도", "35.8723".into()),
        ]),
        record(vec![
            ("순번", 2.into()),
            ("공원명", "칠성공원(Demo)".into()),
            ("주소", "대구광역시 북구 칠성동2가 산 45-3".into()),
            ("면적", "67,000㎡".into()),
            ("시설", "산책로, 운동기구, 벤치".into()),
            ("개방시간", "상시개방".into()),
            ("경도", "128.5834".into()),
            ("위도", "35.8812".into()),
        ]),
    ]
}

fn culture() -> Vec<Record> {
    vec![
        record(vec![
            ("순번", 1.into()),
            ("시설명", "북구문화회관(Demo)".into()),
            ("주소", "대구광역시 북구 산격동 1295".into()),
            ("전화번호", "053-665-9876".into()),
            ("운영시간", "09:00~22:00".into()),
            ("시설규모", "대공연장, 소공연장, 전시실".into()),
            ("경도", "128.5712".into()),
            ("위도", "35.8956".into()),
        ]),
        record(vec![
            ("순번", 2.into()),
            ("시설명", "칠성문화센터(Demo)".into()),
            ("주소", "대구광역시 북구 칠성동1가 456-78".into()),
            ("전화번호", "053-665-1357".into()),
            ("운영시간", "09:00~18:00".into()),
            ("시설규모", "전시실, 체험실, 회의실".into()),
            ("경도", "128.5867".into()),
            ("위도", "35.8723".into()),
        ]),
    ]
}
