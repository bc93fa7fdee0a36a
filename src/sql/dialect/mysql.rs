use super::{Paging, Placeholder, Profile, StringStyle};

pub(super) const PROFILE: Profile = Profile {
    name: "mysql",
    quotes: ('`', '`'),
    // Backslash is an escape character in MySQL string literals
    strings: StringStyle::Backslash,
    booleans: ("1", "0"),
    ilike: false,
    placeholder: Placeholder::Question,
    paging: Paging::LimitOffset,
    renames: &[
        ("STRFTIME", "DATE_FORMAT"),
        ("TO_CHAR", "DATE_FORMAT"),
        ("NVL", "IFNULL"),
        ("ISNULL", "IFNULL"),
        ("SUBSTR", "SUBSTRING"),
    ],
};
