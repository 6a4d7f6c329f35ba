//! Static country and UN subregion reference tables.
//!
//! Used for display names, free-text country detection and to seed the
//! `world_borders` table when no reference dataset has been imported.

/// A country of the embedded reference table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountryRef {
    pub iso2: &'static str,
    pub name: &'static str,
    pub region: i64,
    pub subregion: i64,
}

const fn c(iso2: &'static str, name: &'static str, region: i64, subregion: i64) -> CountryRef {
    CountryRef {
        iso2,
        name,
        region,
        subregion,
    }
}

/// UN M49 subregion codes and names.
pub const SUBREGIONS: &[(i64, &str)] = &[
    (5, "South America"),
    (11, "Western Africa"),
    (13, "Central America"),
    (14, "Eastern Africa"),
    (15, "Northern Africa"),
    (17, "Middle Africa"),
    (18, "Southern Africa"),
    (21, "Northern America"),
    (29, "Caribbean"),
    (30, "Eastern Asia"),
    (34, "Southern Asia"),
    (35, "South-Eastern Asia"),
    (39, "Southern Europe"),
    (53, "Australia and New Zealand"),
    (54, "Melanesia"),
    (57, "Micronesia"),
    (61, "Polynesia"),
    (143, "Central Asia"),
    (145, "Western Asia"),
    (151, "Eastern Europe"),
    (154, "Northern Europe"),
    (155, "Western Europe"),
];

pub const COUNTRIES: &[CountryRef] = &[
    // Africa
    c("BI", "Burundi", 2, 14),
    c("KM", "Comoros", 2, 14),
    c("DJ", "Djibouti", 2, 14),
    c("ER", "Eritrea", 2, 14),
    c("ET", "Ethiopia", 2, 14),
    c("KE", "Kenya", 2, 14),
    c("MG", "Madagascar", 2, 14),
    c("MW", "Malawi", 2, 14),
    c("MU", "Mauritius", 2, 14),
    c("YT", "Mayotte", 2, 14),
    c("MZ", "Mozambique", 2, 14),
    c("RE", "Réunion", 2, 14),
    c("RW", "Rwanda", 2, 14),
    c("SC", "Seychelles", 2, 14),
    c("SO", "Somalia", 2, 14),
    c("SS", "South Sudan", 2, 14),
    c("TZ", "Tanzania", 2, 14),
    c("UG", "Uganda", 2, 14),
    c("ZM", "Zambia", 2, 14),
    c("ZW", "Zimbabwe", 2, 14),
    c("AO", "Angola", 2, 17),
    c("CM", "Cameroon", 2, 17),
    c("CF", "Central African Republic", 2, 17),
    c("TD", "Chad", 2, 17),
    c("CG", "Congo", 2, 17),
    c("CD", "Democratic Republic of the Congo", 2, 17),
    c("GQ", "Equatorial Guinea", 2, 17),
    c("GA", "Gabon", 2, 17),
    c("ST", "São Tomé and Príncipe", 2, 17),
    c("DZ", "Algeria", 2, 15),
    c("EG", "Egypt", 2, 15),
    c("LY", "Libya", 2, 15),
    c("MA", "Morocco", 2, 15),
    c("SD", "Sudan", 2, 15),
    c("TN", "Tunisia", 2, 15),
    c("EH", "Western Sahara", 2, 15),
    c("BW", "Botswana", 2, 18),
    c("LS", "Lesotho", 2, 18),
    c("NA", "Namibia", 2, 18),
    c("ZA", "South Africa", 2, 18),
    c("SZ", "Swaziland", 2, 18),
    c("BJ", "Benin", 2, 11),
    c("BF", "Burkina Faso", 2, 11),
    c("CV", "Cape Verde", 2, 11),
    c("CI", "Côte d'Ivoire", 2, 11),
    c("GM", "Gambia", 2, 11),
    c("GH", "Ghana", 2, 11),
    c("GN", "Guinea", 2, 11),
    c("GW", "Guinea-Bissau", 2, 11),
    c("LR", "Liberia", 2, 11),
    c("ML", "Mali", 2, 11),
    c("MR", "Mauritania", 2, 11),
    c("NE", "Niger", 2, 11),
    c("NG", "Nigeria", 2, 11),
    c("SH", "Saint Helena", 2, 11),
    c("SN", "Senegal", 2, 11),
    c("SL", "Sierra Leone", 2, 11),
    c("TG", "Togo", 2, 11),
    // Americas
    c("AI", "Anguilla", 19, 29),
    c("AG", "Antigua and Barbuda", 19, 29),
    c("AW", "Aruba", 19, 29),
    c("BS", "Bahamas", 19, 29),
    c("BB", "Barbados", 19, 29),
    c("VG", "British Virgin Islands", 19, 29),
    c("KY", "Cayman Islands", 19, 29),
    c("CU", "Cuba", 19, 29),
    c("DM", "Dominica", 19, 29),
    c("DO", "Dominican Republic", 19, 29),
    c("GD", "Grenada", 19, 29),
    c("GP", "Guadeloupe", 19, 29),
    c("HT", "Haiti", 19, 29),
    c("JM", "Jamaica", 19, 29),
    c("MQ", "Martinique", 19, 29),
    c("MS", "Montserrat", 19, 29),
    c("AN", "Netherlands Antilles", 19, 29),
    c("PR", "Puerto Rico", 19, 29),
    c("KN", "Saint Kitts and Nevis", 19, 29),
    c("LC", "Saint Lucia", 19, 29),
    c("VC", "Saint Vincent and the Grenadines", 19, 29),
    c("TT", "Trinidad and Tobago", 19, 29),
    c("TC", "Turks and Caicos Islands", 19, 29),
    c("VI", "United States Virgin Islands", 19, 29),
    c("BZ", "Belize", 19, 13),
    c("CR", "Costa Rica", 19, 13),
    c("SV", "El Salvador", 19, 13),
    c("GT", "Guatemala", 19, 13),
    c("HN", "Honduras", 19, 13),
    c("MX", "Mexico", 19, 13),
    c("NI", "Nicaragua", 19, 13),
    c("PA", "Panama", 19, 13),
    c("AR", "Argentina", 19, 5),
    c("BO", "Bolivia", 19, 5),
    c("BR", "Brazil", 19, 5),
    c("CL", "Chile", 19, 5),
    c("CO", "Colombia", 19, 5),
    c("EC", "Ecuador", 19, 5),
    c("FK", "Falkland Islands", 19, 5),
    c("GF", "French Guiana", 19, 5),
    c("GY", "Guyana", 19, 5),
    c("PY", "Paraguay", 19, 5),
    c("PE", "Peru", 19, 5),
    c("SR", "Suriname", 19, 5),
    c("UY", "Uruguay", 19, 5),
    c("VE", "Venezuela", 19, 5),
    c("BM", "Bermuda", 19, 21),
    c("CA", "Canada", 19, 21),
    c("GL", "Greenland", 19, 21),
    c("PM", "Saint Pierre and Miquelon", 19, 21),
    c("US", "United States", 19, 21),
    // Asia
    c("KZ", "Kazakhstan", 142, 143),
    c("KG", "Kyrgyzstan", 142, 143),
    c("TJ", "Tajikistan", 142, 143),
    c("TM", "Turkmenistan", 142, 143),
    c("UZ", "Uzbekistan", 142, 143),
    c("CN", "China", 142, 30),
    c("HK", "Hong Kong", 142, 30),
    c("MO", "Macao", 142, 30),
    c("KP", "North Korea", 142, 30),
    c("KR", "South Korea", 142, 30),
    c("JP", "Japan", 142, 30),
    c("MN", "Mongolia", 142, 30),
    c("TW", "Taiwan", 142, 30),
    c("AF", "Afghanistan", 142, 34),
    c("BD", "Bangladesh", 142, 34),
    c("BT", "Bhutan", 142, 34),
    c("IN", "India", 142, 34),
    c("IR", "Iran", 142, 34),
    c("MV", "Maldives", 142, 34),
    c("NP", "Nepal", 142, 34),
    c("PK", "Pakistan", 142, 34),
    c("LK", "Sri Lanka", 142, 34),
    c("BN", "Brunei", 142, 35),
    c("KH", "Cambodia", 142, 35),
    c("ID", "Indonesia", 142, 35),
    c("LA", "Laos", 142, 35),
    c("MY", "Malaysia", 142, 35),
    c("MM", "Myanmar", 142, 35),
    c("PH", "Philippines", 142, 35),
    c("SG", "Singapore", 142, 35),
    c("TH", "Thailand", 142, 35),
    c("TL", "Timor-Leste", 142, 35),
    c("VN", "Viet Nam", 142, 35),
    c("AM", "Armenia", 142, 145),
    c("AZ", "Azerbaijan", 142, 145),
    c("BH", "Bahrain", 142, 145),
    c("CY", "Cyprus", 142, 145),
    c("GE", "Georgia", 142, 145),
    c("IQ", "Iraq", 142, 145),
    c("IL", "Israel", 142, 145),
    c("JO", "Jordan", 142, 145),
    c("KW", "Kuwait", 142, 145),
    c("LB", "Lebanon", 142, 145),
    c("PS", "Palestinian Territory", 142, 145),
    c("OM", "Oman", 142, 145),
    c("QA", "Qatar", 142, 145),
    c("SA", "Saudi Arabia", 142, 145),
    c("SY", "Syria", 142, 145),
    c("TR", "Turkey", 142, 145),
    c("AE", "United Arab Emirates", 142, 145),
    c("YE", "Yemen", 142, 145),
    // Europe
    c("BY", "Belarus", 150, 151),
    c("BG", "Bulgaria", 150, 151),
    c("CZ", "Czech Republic", 150, 151),
    c("HU", "Hungary", 150, 151),
    c("MD", "Moldova", 150, 151),
    c("PL", "Poland", 150, 151),
    c("RO", "Romania", 150, 151),
    c("RU", "Russia", 150, 151),
    c("SK", "Slovakia", 150, 151),
    c("UA", "Ukraine", 150, 151),
    c("DK", "Denmark", 150, 154),
    c("EE", "Estonia", 150, 154),
    c("FO", "Faroe Islands", 150, 154),
    c("FI", "Finland", 150, 154),
    c("IS", "Iceland", 150, 154),
    c("IE", "Ireland", 150, 154),
    c("LV", "Latvia", 150, 154),
    c("LT", "Lithuania", 150, 154),
    c("NO", "Norway", 150, 154),
    c("SE", "Sweden", 150, 154),
    c("GB", "United Kingdom", 150, 154),
    c("AL", "Albania", 150, 39),
    c("AD", "Andorra", 150, 39),
    c("BA", "Bosnia and Herzegovina", 150, 39),
    c("HR", "Croatia", 150, 39),
    c("GI", "Gibraltar", 150, 39),
    c("GR", "Greece", 150, 39),
    c("VA", "Holy See", 150, 39),
    c("IT", "Italy", 150, 39),
    c("MK", "Macedonia", 150, 39),
    c("MT", "Malta", 150, 39),
    c("ME", "Montenegro", 150, 39),
    c("PT", "Portugal", 150, 39),
    c("SM", "San Marino", 150, 39),
    c("RS", "Serbia", 150, 39),
    c("SI", "Slovenia", 150, 39),
    c("ES", "Spain", 150, 39),
    c("AT", "Austria", 150, 155),
    c("BE", "Belgium", 150, 155),
    c("FR", "France", 150, 155),
    c("DE", "Germany", 150, 155),
    c("LI", "Liechtenstein", 150, 155),
    c("LU", "Luxembourg", 150, 155),
    c("MC", "Monaco", 150, 155),
    c("NL", "Netherlands", 150, 155),
    c("CH", "Switzerland", 150, 155),
    // Oceania
    c("AU", "Australia", 9, 53),
    c("NZ", "New Zealand", 9, 53),
    c("NF", "Norfolk Island", 9, 53),
    c("FJ", "Fiji", 9, 54),
    c("NC", "New Caledonia", 9, 54),
    c("PG", "Papua New Guinea", 9, 54),
    c("SB", "Solomon Islands", 9, 54),
    c("VU", "Vanuatu", 9, 54),
    c("GU", "Guam", 9, 57),
    c("KI", "Kiribati", 9, 57),
    c("MH", "Marshall Islands", 9, 57),
    c("FM", "Micronesia", 9, 57),
    c("NR", "Nauru", 9, 57),
    c("MP", "Northern Mariana Islands", 9, 57),
    c("PW", "Palau", 9, 57),
    c("AS", "American Samoa", 9, 61),
    c("CK", "Cook Islands", 9, 61),
    c("PF", "French Polynesia", 9, 61),
    c("NU", "Niue", 9, 61),
    c("PN", "Pitcairn", 9, 61),
    c("WS", "Samoa", 9, 61),
    c("TK", "Tokelau", 9, 61),
    c("TO", "Tonga", 9, 61),
    c("TV", "Tuvalu", 9, 61),
    c("WF", "Wallis and Futuna", 9, 61),
];

/// Display name for an ISO 3166-1 alpha-2 code.
pub fn iso_to_country(iso2: &str) -> Option<&'static str> {
    COUNTRIES
        .iter()
        .find(|country| country.iso2.eq_ignore_ascii_case(iso2))
        .map(|country| country.name)
}

/// Display name for a UN subregion code.
pub fn subregion_name(code: i64) -> Option<&'static str> {
    SUBREGIONS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}
