//! Built-in campaign data set shown when no other source is wired in.

use chrono::NaiveDate;

use super::{Campaign, CampaignStatus};

/// The eight demo campaigns: four on Google Ads, two each on Facebook and
/// Instagram; three active and five completed.
pub fn campaigns() -> Vec<Campaign> {
    use CampaignStatus::{Active, Completed};

    vec![
        Campaign::new(
            "Black Friday",
            "Google Ads",
            Completed,
            75_000.0,
            73_200.0,
            1_250_000,
            45_000,
            2_250,
            ymd(2024, 11, 20),
            ymd(2024, 11, 30),
        ),
        Campaign::new(
            "Holiday Special",
            "Facebook Ads",
            Active,
            50_000.0,
            38_500.0,
            890_000,
            32_000,
            1_850,
            ymd(2024, 12, 1),
            ymd(2024, 12, 31),
        ),
        Campaign::new(
            "Cyber Monday",
            "Google Ads",
            Completed,
            60_000.0,
            58_900.0,
            980_000,
            38_000,
            1_920,
            ymd(2024, 12, 2),
            ymd(2024, 12, 3),
        ),
        Campaign::new(
            "Summer Sale",
            "Instagram Ads",
            Completed,
            40_000.0,
            39_800.0,
            720_000,
            25_000,
            1_100,
            ymd(2024, 6, 15),
            ymd(2024, 7, 15),
        ),
        Campaign::new(
            "New Year",
            "Google Ads",
            Active,
            45_000.0,
            12_300.0,
            310_000,
            11_500,
            540,
            ymd(2024, 12, 26),
            ymd(2025, 1, 10),
        ),
        Campaign::new(
            "Spring Launch",
            "Facebook Ads",
            Completed,
            35_000.0,
            34_100.0,
            640_000,
            19_800,
            870,
            ymd(2024, 3, 1),
            ymd(2024, 4, 15),
        ),
        Campaign::new(
            "Back to School",
            "Instagram Ads",
            Completed,
            30_000.0,
            29_500.0,
            560_000,
            17_200,
            760,
            ymd(2024, 8, 10),
            ymd(2024, 9, 5),
        ),
        Campaign::new(
            "Valentine's Day",
            "Google Ads",
            Active,
            25_000.0,
            8_200.0,
            190_000,
            7_400,
            310,
            ymd(2025, 2, 1),
            ymd(2025, 2, 14),
        ),
    ]
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    // Literal dates above are all valid calendar days.
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}
