//! The fixed table of Denver recreation centers.
//!
//! Coordinates were geocoded once from the listed addresses. Report rows and
//! routing responses are matched against this table by position, so the
//! order here is part of the data format.

use crate::models::Site;

macro_rules! site {
    ($name:expr, $lat:expr, $lng:expr, $address:expr) => {
        Site {
            name: $name,
            latitude: $lat,
            longitude: $lng,
            address: $address,
        }
    };
}

pub static SITES: &[Site] = &[
    site!("Ashland", 39.6789, -104.9811, "1600 E 19th Ave, Denver, CO 80218"),
    site!("Athmar", 39.6833, -105.0167, "1200 S Hazel Ct, Denver, CO 80219"),
    site!("Barnum", 39.7167, -105.0333, "360 Hooker St, Denver, CO 80219"),
    site!("Carla Madison", 39.7311, -104.9528, "2401 E Colfax Ave, Denver, CO 80206"),
    site!("Central Park", 39.7583, -104.8833, "9651 E Martin Luther King Jr Blvd, Denver, CO 80238"),
    site!("Cook Park", 39.6500, -104.9333, "7100 S Cherry Creek Dr, Denver, CO 80224"),
    site!("Crestmoor Park", 39.7000, -104.9167, "700 Monaco Pkwy, Denver, CO 80220"),
    site!("Dunham", 39.7833, -104.9833, "1355 Osceola St, Denver, CO 80204"),
    site!("Eisenhower", 39.7333, -105.0000, "4300 W Dartmouth Ave, Denver, CO 80236"),
    site!("Glenarm", 39.7394, -104.9847, "2800 Glenarm Pl, Denver, CO 80205"),
    site!("Green Valley Ranch", 39.8333, -104.8000, "4890 Argonne St, Denver, CO 80249"),
    site!("Hampden Heights", 39.6500, -104.8833, "5765 S Jasmine St, Denver, CO 80120"),
    site!("Harvey Park", 39.6833, -105.0500, "2120 S Tennyson St, Denver, CO 80219"),
    site!("Hiawatha Davis", 39.7500, -104.9500, "3334 Holly St, Denver, CO 80207"),
    site!("Highland", 39.7667, -105.0167, "2880 Osceola St, Denver, CO 80212"),
    site!("La Alma", 39.7333, -105.0000, "1325 W 11th Ave, Denver, CO 80204"),
    site!("La Familia", 39.7667, -104.9667, "65 S Elati St, Denver, CO 80223"),
    site!("Martin Luther King Jr", 39.7500, -104.9333, "3880 Newport St, Denver, CO 80207"),
    site!("Montbello", 39.7833, -104.8333, "15555 E 53rd Ave, Denver, CO 80239"),
    site!("Montclair", 39.7167, -104.9167, "729 Ulster Way, Denver, CO 80220"),
    site!("Paco Sanchez", 39.7167, -105.0333, "4701 W 10th Ave, Denver, CO 80204"),
    site!("Platt Park", 39.6833, -104.9833, "1500 S Grant St, Denver, CO 80210"),
    site!("Rude", 39.7500, -104.9833, "2855 W Holden Pl, Denver, CO 80204"),
    site!("Scheitler", 39.6500, -105.0167, "5031 W 46th Ave, Denver, CO 80212"),
    site!("Sloan's Lake", 39.7500, -105.0333, "1700 N Quitman St, Denver, CO 80204"),
    site!("St. Charles", 39.7500, -104.9500, "3777 Lafayette St, Denver, CO 80205"),
    site!("Stapleton", 39.7667, -104.8833, "3815 N Magnolia St, Denver, CO 80207"),
    site!("Twentieth Street", 39.7500, -104.9833, "1011 20th St, Denver, CO 80205"),
    site!("Virginia Village", 39.6833, -104.9167, "2250 S Dahlia St, Denver, CO 80222"),
    site!("Washington Park", 39.6972, -104.9722, "701 S Franklin St, Denver, CO 80209"),
    site!("Wheat Ridge", 39.7667, -105.0833, "4005 Kipling St, Wheat Ridge, CO 80033"),
    site!("Woodbury", 39.7000, -104.9000, "3101 S Grape St, Denver, CO 80222"),
];

/// Finds a site by partial, case-insensitive name.
///
/// A site matches when its name contains the query or the query contains its
/// name, so both `"wash"` and `"Washington Park Rec Center"` find
/// "Washington Park". The first match in table order wins.
pub fn lookup_site_by_name(query: &str) -> Option<&'static Site> {
    let needle = query.to_lowercase();
    SITES.iter().find(|site| {
        let name = site.name.to_lowercase();
        name.contains(&needle) || needle.contains(&name)
    })
}
