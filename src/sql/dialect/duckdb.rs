use super::{Paging, Placeholder, Profile, StringStyle};

pub(super) const PROFILE: Profile = Profile {
    name: "duckdb",
    quotes: ('"', '"'),
    strings: StringStyle::Standard,
    booleans: ("true", "false"),
    ilike: true,
    placeholder: Placeholder::Dollar,
    paging: Paging::LimitOffset,
    renames: &[
        ("TO_CHAR", "STRFTIME"),
        ("DATE_FORMAT", "STRFTIME"),
        ("NVL", "COALESCE"),
        ("IFNULL", "COALESCE"),
        ("ISNULL", "COALESCE"),
    ],
};
