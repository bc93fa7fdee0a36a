use super::{Paging, Placeholder, Profile, StringStyle};

pub(super) const PROFILE: Profile = Profile {
    name: "tsql",
    quotes: ('[', ']'),
    strings: StringStyle::National,
    booleans: ("1", "0"),
    ilike: false,
    placeholder: Placeholder::AtP,
    paging: Paging::OffsetFetch,
    renames: &[
        ("LENGTH", "LEN"),
        ("SUBSTR", "SUBSTRING"),
        ("NOW", "GETDATE"),
        ("STRFTIME", "FORMAT"),
        ("TO_CHAR", "FORMAT"),
        ("DATE_FORMAT", "FORMAT"),
        ("NVL", "ISNULL"),
        ("IFNULL", "ISNULL"),
    ],
};
