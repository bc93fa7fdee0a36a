use super::{Paging, Placeholder, Profile, StringStyle};

pub(super) const PROFILE: Profile = Profile {
    name: "postgres",
    quotes: ('"', '"'),
    strings: StringStyle::Standard,
    booleans: ("true", "false"),
    ilike: true,
    placeholder: Placeholder::Dollar,
    paging: Paging::LimitOffset,
    renames: &[
        ("STRFTIME", "TO_CHAR"),
        ("DATE_FORMAT", "TO_CHAR"),
        ("NVL", "COALESCE"),
        ("IFNULL", "COALESCE"),
        ("ISNULL", "COALESCE"),
    ],
};
