//! Built-in canonical entity tables.
//!
//! League team lists, common individual competitors, and a shortcut
//! alias table. Config may extend both at startup.

use serde::Serialize;
use std::collections::BTreeSet;

/// A canonical name plus every alias that resolves to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalEntity {
    pub canonical_name: String,
    pub alias_set: BTreeSet<String>,
}

impl CanonicalEntity {
    pub fn new(canonical_name: impl Into<String>) -> Self {
        Self {
            canonical_name: canonical_name.into(),
            alias_set: BTreeSet::new(),
        }
    }
}

/// A named block of canonical entities.
pub struct League {
    pub name: &'static str,
    pub entities: &'static [&'static str],
}

pub const LEAGUES: &[League] = &[
    League {
        name: "NBA",
        entities: &[
            "Atlanta Hawks", "Boston Celtics", "Brooklyn Nets", "Charlotte Hornets",
            "Chicago Bulls", "Cleveland Cavaliers", "Dallas Mavericks", "Denver Nuggets",
            "Detroit Pistons", "Golden State Warriors", "Houston Rockets", "Indiana Pacers",
            "Los Angeles Clippers", "Los Angeles Lakers", "Memphis Grizzlies", "Miami Heat",
            "Milwaukee Bucks", "Minnesota Timberwolves", "New Orleans Pelicans", "New York Knicks",
            "Oklahoma City Thunder", "Orlando Magic", "Philadelphia 76ers", "Phoenix Suns",
            "Portland Trail Blazers", "Sacramento Kings", "San Antonio Spurs", "Toronto Raptors",
            "Utah Jazz", "Washington Wizards",
        ],
    },
    League {
        name: "WNBA",
        entities: &[
            "Atlanta Dream", "Chicago Sky", "Connecticut Sun", "Dallas Wings",
            "Indiana Fever", "Las Vegas Aces", "Los Angeles Sparks", "Minnesota Lynx",
            "New York Liberty", "Phoenix Mercury", "Seattle Storm", "Washington Mystics",
        ],
    },
    League {
        name: "NFL",
        entities: &[
            "Arizona Cardinals", "Atlanta Falcons", "Baltimore Ravens", "Buffalo Bills",
            "Carolina Panthers", "Chicago Bears", "Cincinnati Bengals", "Cleveland Browns",
            "Dallas Cowboys", "Denver Broncos", "Detroit Lions", "Green Bay Packers",
            "Houston Texans", "Indianapolis Colts", "Jacksonville Jaguars", "Kansas City Chiefs",
            "Las Vegas Raiders", "Los Angeles Chargers", "Los Angeles Rams", "Miami Dolphins",
            "Minnesota Vikings", "New England Patriots", "New Orleans Saints", "New York Giants",
            "New York Jets", "Philadelphia Eagles", "Pittsburgh Steelers", "San Francisco 49ers",
            "Seattle Seahawks", "Tampa Bay Buccaneers", "Tennessee Titans", "Washington Commanders",
        ],
    },
    League {
        name: "MLB",
        entities: &[
            "Arizona Diamondbacks", "Atlanta Braves", "Baltimore Orioles", "Boston Red Sox",
            "Chicago Cubs", "Chicago White Sox", "Cincinnati Reds", "Cleveland Guardians",
            "Colorado Rockies", "Detroit Tigers", "Houston Astros", "Kansas City Royals",
            "Los Angeles Angels", "Los Angeles Dodgers", "Miami Marlins", "Milwaukee Brewers",
            "Minnesota Twins", "New York Mets", "New York Yankees", "Oakland Athletics",
            "Philadelphia Phillies", "Pittsburgh Pirates", "San Diego Padres", "San Francisco Giants",
            "Seattle Mariners", "St. Louis Cardinals", "Tampa Bay Rays", "Texas Rangers",
            "Toronto Blue Jays", "Washington Nationals",
        ],
    },
    League {
        name: "NHL",
        entities: &[
            "Anaheim Ducks", "Arizona Coyotes", "Boston Bruins", "Buffalo Sabres",
            "Calgary Flames", "Carolina Hurricanes", "Chicago Blackhawks", "Colorado Avalanche",
            "Columbus Blue Jackets", "Dallas Stars", "Detroit Red Wings", "Edmonton Oilers",
            "Florida Panthers", "Los Angeles Kings", "Minnesota Wild", "Montreal Canadiens",
            "Nashville Predators", "New Jersey Devils", "New York Islanders", "New York Rangers",
            "Ottawa Senators", "Philadelphia Flyers", "Pittsburgh Penguins", "San Jose Sharks",
            "Seattle Kraken", "St. Louis Blues", "Tampa Bay Lightning", "Toronto Maple Leafs",
            "Utah Hockey Club", "Vancouver Canucks", "Vegas Golden Knights", "Washington Capitals",
            "Winnipeg Jets",
        ],
    },
    League {
        name: "NASCAR",
        entities: &[
            "Chase Elliott", "Kyle Larson", "Denny Hamlin", "Martin Truex Jr", "Joey Logano",
            "Brad Keselowski", "Kevin Harvick", "Aric Almirola", "William Byron", "Alex Bowman",
            "Tyler Reddick", "Christopher Bell", "Ryan Blaney", "Austin Dillon", "Ross Chastain",
            "Bubba Wallace", "Michael McDowell", "Cole Custer", "Harrison Burton", "Noah Gragson",
            "Todd Gilliland", "Corey LaJoie", "Justin Haley", "BJ McLeod", "Ricky Stenhouse Jr",
            "Chris Buescher", "Erik Jones", "Austin Cindric", "Josh Bilicki",
        ],
    },
    League {
        name: "UFC",
        entities: &[
            "Jon Jones", "Stipe Miocic", "Francis Ngannou", "Ciryl Gane", "Tom Aspinall",
            "Islam Makhachev", "Alexander Volkanovski", "Max Holloway", "Dustin Poirier",
            "Charles Oliveira", "Conor McGregor", "Justin Gaethje", "Khabib Nurmagomedov",
            "Leon Edwards", "Kamaru Usman", "Colby Covington", "Sean Strickland", "Dricus Du Plessis",
            "Alex Pereira", "Israel Adesanya", "Jan Blachowicz", "Jiri Prochazka",
        ],
    },
    League {
        name: "Boxing",
        entities: &[
            "Tyson Fury", "Oleksandr Usyk", "Anthony Joshua", "Deontay Wilder",
            "Canelo Alvarez", "Gennady Golovkin", "Ryan Garcia", "Gervonta Davis",
            "Terence Crawford", "Errol Spence Jr", "Devin Haney", "Vasiliy Lomachenko",
        ],
    },
    League {
        name: "CFB",
        entities: &[
            "Alabama Crimson Tide", "Georgia Bulldogs", "Ohio State Buckeyes", "Michigan Wolverines",
            "Texas Longhorns", "Penn State Nittany Lions", "Notre Dame Fighting Irish",
            "Florida State Seminoles", "Clemson Tigers", "Oregon Ducks", "USC Trojans",
            "Oklahoma Sooners", "Texas A&M Aggies", "LSU Tigers", "Miami Hurricanes",
            "Tennessee Volunteers", "Washington Huskies", "Utah Utes", "TCU Horned Frogs",
        ],
    },
    League {
        name: "EPL",
        entities: &[
            "Arsenal", "Aston Villa", "Bournemouth", "Brentford", "Brighton",
            "Chelsea", "Crystal Palace", "Everton", "Fulham", "Ipswich Town",
            "Leicester City", "Liverpool", "Manchester City", "Manchester United",
            "Newcastle United", "Nottingham Forest", "Southampton", "Tottenham Hotspur",
            "West Ham United", "Wolverhampton Wanderers",
        ],
    },
];

/// Exact shortcuts. Keys are matched case-insensitively.
pub const ALIASES: &[(&str, &str)] = &[
    // NBA
    ("knicks", "New York Knicks"), ("ny knicks", "New York Knicks"),
    ("lakers", "Los Angeles Lakers"), ("la lakers", "Los Angeles Lakers"),
    ("warriors", "Golden State Warriors"), ("gsw", "Golden State Warriors"),
    ("golden state", "Golden State Warriors"),
    ("celtics", "Boston Celtics"),
    ("bulls", "Chicago Bulls"),
    ("heat", "Miami Heat"),
    ("nets", "Brooklyn Nets"), ("bk nets", "Brooklyn Nets"),
    ("bucks", "Milwaukee Bucks"),
    ("nuggets", "Denver Nuggets"),
    ("suns", "Phoenix Suns"),
    ("sixers", "Philadelphia 76ers"), ("philly", "Philadelphia 76ers"),
    ("76ers", "Philadelphia 76ers"),
    ("clippers", "Los Angeles Clippers"), ("la clippers", "Los Angeles Clippers"),
    ("raptors", "Toronto Raptors"),
    ("hawks", "Atlanta Hawks"),
    ("cavs", "Cleveland Cavaliers"), ("cavaliers", "Cleveland Cavaliers"),
    ("mavs", "Dallas Mavericks"), ("mavericks", "Dallas Mavericks"),
    ("grizzlies", "Memphis Grizzlies"),
    ("wolves", "Minnesota Timberwolves"), ("t-wolves", "Minnesota Timberwolves"),
    ("pelicans", "New Orleans Pelicans"),
    ("thunder", "Oklahoma City Thunder"), ("okc", "Oklahoma City Thunder"),
    ("magic", "Orlando Magic"),
    ("blazers", "Portland Trail Blazers"),
    ("kings", "Sacramento Kings"),
    ("spurs", "San Antonio Spurs"),
    ("jazz", "Utah Jazz"),
    ("wizards", "Washington Wizards"),
    ("pacers", "Indiana Pacers"),
    ("rockets", "Houston Rockets"),
    ("pistons", "Detroit Pistons"),
    ("hornets", "Charlotte Hornets"),
    // NFL
    ("cowboys", "Dallas Cowboys"), ("dak", "Dallas Cowboys"),
    ("patriots", "New England Patriots"), ("pats", "New England Patriots"),
    ("chiefs", "Kansas City Chiefs"), ("kc chiefs", "Kansas City Chiefs"),
    ("eagles", "Philadelphia Eagles"),
    ("bills", "Buffalo Bills"),
    ("ravens", "Baltimore Ravens"),
    ("49ers", "San Francisco 49ers"), ("niners", "San Francisco 49ers"),
    ("sf", "San Francisco 49ers"),
    ("rams", "Los Angeles Rams"), ("la rams", "Los Angeles Rams"),
    ("bengals", "Cincinnati Bengals"),
    ("steelers", "Pittsburgh Steelers"),
    ("packers", "Green Bay Packers"), ("gb", "Green Bay Packers"),
    ("seahawks", "Seattle Seahawks"),
    // MLB
    ("yankees", "New York Yankees"), ("ny yankees", "New York Yankees"),
    ("dodgers", "Los Angeles Dodgers"), ("la dodgers", "Los Angeles Dodgers"),
    ("red sox", "Boston Red Sox"),
    ("cubs", "Chicago Cubs"),
    ("mets", "New York Mets"),
    ("astros", "Houston Astros"),
    ("braves", "Atlanta Braves"),
    // NHL
    ("bruins", "Boston Bruins"),
    ("lightning", "Tampa Bay Lightning"), ("tb lightning", "Tampa Bay Lightning"),
    ("maple leafs", "Toronto Maple Leafs"), ("leafs", "Toronto Maple Leafs"),
    ("oilers", "Edmonton Oilers"),
    ("golden knights", "Vegas Golden Knights"), ("vgk", "Vegas Golden Knights"),
    ("rangers", "New York Rangers"), ("ny rangers", "New York Rangers"),
    ("penguins", "Pittsburgh Penguins"), ("pens", "Pittsburgh Penguins"),
    // EPL
    ("man city", "Manchester City"), ("city", "Manchester City"),
    ("man utd", "Manchester United"), ("man united", "Manchester United"),
    ("spurs fc", "Tottenham Hotspur"),
    ("wolves fc", "Wolverhampton Wanderers"),
    ("villa", "Aston Villa"),
];
