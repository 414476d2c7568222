//! Category codes accepted by `/search` and the Vietmap keywords they expand to.

/// Code → keyword group. Codes follow the Vietmap POI category scheme.
const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    ("1001", &["Quán Giải Khát"]),
    ("1002", &["Nhà Hàng Quán Ăn"]),
    ("1003", &["Khu Ăn Uống"]),
    ("2000", &["Khách Sạn", "Nhà Nghỉ"]),
    ("2001", &["Khách Sạn"]),
    ("2002", &["Nhà Nghỉ"]),
    ("3004", &["Cửa Hàng Cửa Tiệm"]),
    ("4004", &["Du Lịch"]),
    ("4001-3", &["Văn Hóa", "Trung Tâm Văn Hóa Thể Thao"]),
    ("4001-4", &["Văn Hóa", "Thư Viện"]),
    ("4001-5", &["Văn Hóa", "Bảo Tàng"]),
    ("4002-2", &["Giải Trí", "Công Viên"]),
    ("4002-6", &["Giải Trí", "Bar Pub"]),
    ("4002-10", &["Giải Trí", "Bida"]),
    ("4002-11", &["Giải Trí", "Karaoke"]),
    ("4002-14", &["Giải Trí", "Khu Vui Chơi Giải Trí"]),
    ("4003-1", &["Làm Đẹp", "Hair Salon"]),
    ("4003-2", &["Làm Đẹp", "Spa"]),
    ("4003-3", &["Làm Đẹp", "Xông Hơi Massage"]),
    ("4004-1", &["Du Lịch", "Di Tích Văn Hóa Lịch Sử"]),
    ("4004-2", &["Du Lịch", "Danh Lam Thắng Cảnh"]),
    ("4004-3", &["Du Lịch", "Vườn Quốc Gia"]),
    ("4004-5", &["Du Lịch", "Khu Du Lịch"]),
    ("4004-6", &["Du Lịch", "Bãi Biển"]),
    ("4004-7", &["Du Lịch", "Địa Danh"]),
    ("4004-8", &["Du Lịch", "Điểm Du Lịch"]),
];

pub fn keywords_for(code: &str) -> Option<&'static [&'static str]> {
    CATEGORY_KEYWORDS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, keywords)| *keywords)
}

/// Keywords for every known code, in request order, first occurrence kept.
/// Unknown codes contribute nothing.
pub fn resolve_keywords<S: AsRef<str>>(codes: &[S]) -> Vec<&'static str> {
    let mut keywords: Vec<&'static str> = Vec::new();

    for code in codes {
        if let Some(group) = keywords_for(code.as_ref()) {
            for keyword in group {
                if !keywords.contains(keyword) {
                    keywords.push(keyword);
                }
            }
        }
    }

    keywords
}
