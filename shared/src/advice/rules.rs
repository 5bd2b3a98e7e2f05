//! One rendering function per advice type

use super::diseases::profile_for;
use super::text::{Body, Doc};
use super::{thresholds as t, weather_is_severe, AdviceRequest};
use crate::models::WeatherSnapshot;
use crate::types::Language;

const PLANTING_TIPS_EN: &[&str] = &[
    "Prepare your land by clearing weeds and tilling",
    "Use certified seeds for better yields",
    "Plant at the recommended spacing",
    "Apply base fertilizer if available",
    "Monitor for pests and diseases early",
];
const PLANTING_TIPS_NY: &[&str] = &[
    "Konzani munda wanu mochedwa",
    "Gwiritsani ntchito mbewu zabwino",
    "Bzalani molingana",
    "Gwiritsani ntchito feteleza ngati mulina",
    "Yangayang tizilombo ndi matenda",
];

pub(super) fn planting(request: &AdviceRequest<'_>) -> Body {
    let crop = request.crop;
    let mut en = Doc::new();
    let mut ny = Doc::new();

    en.heading(format!("Planting Recommendations for {}:", crop.name_en))
        .blank()
        .field("Planting Season", &crop.planting_season)
        .field("Growing Period", format!("{} days", crop.growing_period_days))
        .field("Soil Requirements", &crop.soil_type)
        .field("Water Needs", &crop.water_requirement);
    ny.heading(format!("Malangizo a Kubzala {}:", crop.name_ny_or_en()))
        .blank()
        .field("Nyengo ya Kubzala", &crop.planting_season)
        .field("Masiku a Kukula", format!("masiku {}", crop.growing_period_days))
        .field("Mtundu wa Dothi", &crop.soil_type);

    if let Some(region) = &request.farmer.region_name {
        en.field("Your District", region);
        ny.field("Boma Lanu", region);
    }

    if let Some(entry) = request.calendar_entry {
        en.blank()
            .line(format!("**Current Month Activity:** {}", entry.activity_en))
            .line(entry.description_en.clone());
        ny.blank()
            .line(format!(
                "**Ntchito ya Mwezi Uno:** {}",
                entry.activity().get(Language::Ny)
            ))
            .line(entry.description().get(Language::Ny).to_string());
    }

    if let Some(weather) = request.weather {
        if weather.rainfall > t::PLANTING_GOOD_RAIN_MM {
            en.blank().line(
                "**Weather Alert:** Good rainfall conditions for planting. \
                 Ensure proper drainage to prevent waterlogging.",
            );
            ny.blank().line(
                "**Chenjezo la Nyengo:** Mvula ikugwa bwino pobzala. \
                 Onetsetsani kuti madzi akutuluka m'munda kuti asadzaze.",
            );
        } else if weather.rainfall < t::PLANTING_LOW_RAIN_MM {
            en.blank().line(
                "**Weather Alert:** Low rainfall. \
                 Consider irrigation or wait for better rain conditions.",
            );
            ny.blank().line(
                "**Chenjezo la Nyengo:** Mvula ndi yochepa. \
                 Ganizirani zothirira kapena dikirani mvula yokwanira.",
            );
        }
    }

    en.blank().heading("General Planting Tips:");
    PLANTING_TIPS_EN.iter().for_each(|tip| {
        en.bullet(tip);
    });
    ny.blank().heading("Malangizo a Kubzala:");
    PLANTING_TIPS_NY.iter().for_each(|tip| {
        ny.bullet(tip);
    });

    Body {
        en: en.finish(),
        ny: ny.finish(),
        urgent: false,
    }
}

pub(super) fn care(request: &AdviceRequest<'_>) -> Body {
    let crop = request.crop;
    let mut en = Doc::new();
    let mut ny = Doc::new();

    en.heading(format!("Crop Care for {}:", crop.name_en))
        .blank()
        .heading("Watering:")
        .bullet(format!("Water requirement: {}", crop.water_requirement))
        .bullet("Water early morning or late evening")
        .bullet("Avoid watering during hot midday")
        .blank()
        .heading("Weeding:")
        .bullet("Remove weeds regularly to reduce competition")
        .bullet("Be careful not to damage crop roots")
        .bullet("Weed when soil is moist for easier removal")
        .blank()
        .heading("Fertilization:")
        .bullet("Apply top-dress fertilizer as needed")
        .bullet("Use organic manure when available")
        .bullet("Follow recommended application rates")
        .blank()
        .heading("Pest and Disease Monitoring:")
        .bullet("Check plants regularly for signs of damage")
        .bullet("Remove affected plants immediately")
        .bullet("Use integrated pest management approaches");

    ny.heading(format!("Kusamalira {}:", crop.name_ny_or_en()))
        .blank()
        .heading("Kuthirira:")
        .bullet("Thirirani mmawa kapena madzulo")
        .bullet("Osathirira nthawi ya dzuwa lamphamvu")
        .blank()
        .heading("Kuchotsa udzu:")
        .bullet("Chotsani udzu nthawi zonse")
        .bullet("Samalani kuti musawonongese mizu")
        .blank()
        .heading("Feteleza:")
        .bullet("Gwiritsirani ntchito feteleza monga momwe mwausizidwira")
        .bullet("Gwiritsani ntchito manyowa a nyama")
        .blank()
        .heading("Tizilombo ndi Matenda:")
        .bullet("Yangayang mbewu nthawi zonse")
        .bullet("Chotsani mbewu zowonongeka msanga");

    if let Some(weather) = request.weather {
        if weather.temperature_max > t::CARE_HEAT_C {
            en.blank().line(
                "**Heat Stress Alert:** Provide shade during hottest parts of day. \
                 Increase watering frequency.",
            );
            ny.blank().line(
                "**Chenjezo la Kutentha:** Patsani mbewu mthunzi nthawi ya dzuwa lamphamvu. \
                 Thirirani kawirikawiri.",
            );
        }
        if weather.rainfall > t::CARE_HEAVY_RAIN_MM {
            en.blank().line(
                "**Heavy Rain Alert:** Ensure good drainage. Watch for fungal diseases.",
            );
            ny.blank().line(
                "**Chenjezo la Mvula Yambiri:** Onetsetsani kuti madzi akutuluka bwino. \
                 Yang'anirani matenda a fungasi.",
            );
        }
    }

    Body {
        en: en.finish(),
        ny: ny.finish(),
        urgent: false,
    }
}

pub(super) fn disease(request: &AdviceRequest<'_>) -> Body {
    let crop = request.crop;
    let profile = profile_for(crop.crop_type);
    let mut en = Doc::new();
    let mut ny = Doc::new();

    en.heading(format!("Disease Management for {}:", crop.name_en))
        .blank()
        .heading("Common Diseases:")
        .line(profile.disease_list())
        .blank()
        .heading("Prevention Strategies:")
        .bullet(profile.prevention_en)
        .bullet("Regular field inspection")
        .bullet("Remove and destroy infected plants")
        .bullet("Use clean tools and equipment")
        .bullet("Practice crop rotation")
        .blank()
        .heading("Treatment:")
        .bullet("Apply appropriate fungicides if needed")
        .bullet("Improve field drainage")
        .bullet("Reduce plant density if overcrowded")
        .bullet("Seek advice from agricultural extension officers");

    ny.heading(format!("Kuletsa Matenda a {}:", crop.name_ny_or_en()))
        .blank()
        .heading("Matenda Ofala:")
        .line(profile.disease_list())
        .blank()
        .heading("Njira za Kuletsa:")
        .bullet(profile.prevention_ny)
        .bullet("Gwiritsani ntchito mbewu zabwino")
        .bullet("Yangayang munda nthawi zonse")
        .bullet("Chotsani mbewu zodwala msanga")
        .bullet("Gwiritsani ntchito zipangizo zoyera");

    let humid = request
        .weather
        .is_some_and(|w| w.humidity > t::DISEASE_HUMIDITY_PCT);
    if humid {
        en.blank().line(
            "**High Humidity Warning:** Increased risk of fungal diseases. \
             Ensure good air circulation.",
        );
        ny.blank().line(
            "**Chenjezo la Chinyezi Chambiri:** Chiopsezo cha matenda a fungasi chakwera. \
             Onetsetsani kuti mpweya ukuyenda bwino.",
        );
    }

    Body {
        en: en.finish(),
        ny: ny.finish(),
        urgent: humid,
    }
}

pub(super) fn harvest(request: &AdviceRequest<'_>) -> Body {
    let crop = request.crop;
    let mut en = Doc::new();
    let mut ny = Doc::new();

    en.heading(format!("Harvest Information for {}:", crop.name_en))
        .blank()
        .line(format!("**Harvest Season:** {}", crop.harvest_season))
        .line(format!(
            "**Growing Period:** {} days from planting",
            crop.growing_period_days
        ))
        .blank()
        .heading("Signs of Maturity:")
        .bullet("Check for proper color development")
        .bullet("Test firmness and texture")
        .bullet("Monitor moisture content")
        .bullet("Look for natural leaf yellowing")
        .blank()
        .heading("Harvest Tips:")
        .bullet("Harvest during cool parts of the day")
        .bullet("Use clean, sharp tools")
        .bullet("Handle produce carefully to avoid damage")
        .bullet("Sort by quality and size")
        .blank()
        .heading("Post-Harvest:")
        .bullet("Dry properly if needed")
        .bullet("Store in clean, dry conditions")
        .bullet("Monitor for pests during storage")
        .bullet("Market surplus quickly for best prices");

    ny.heading(format!("Malangizo a Kutcha {}:", crop.name_ny_or_en()))
        .blank()
        .line(format!("**Nyengo ya Kutcha:** {}", crop.harvest_season))
        .line(format!("**Masiku a Kukula:** masiku {}", crop.growing_period_days))
        .blank()
        .heading("Zizindikiro za Kucha:")
        .bullet("Yangayang kusintha kwa mtundu")
        .bullet("Funsani kuuma kwa mbewu")
        .bullet("Onani masamba akuchita yellow")
        .blank()
        .heading("Malangizo a Kutcha:")
        .bullet("Tchani nthawi yozizira")
        .bullet("Gwiritsani ntchito zipangizo zakucha")
        .bullet("Samalitsani mbewu musawonongeke")
        .bullet("Sunganitsani mbewu monga mmene ziliri");

    let rain = request
        .weather
        .is_some_and(|w| w.rainfall > t::HARVEST_RAIN_MM);
    if rain {
        en.blank().line(
            "**Weather Alert:** Rain expected. Harvest mature crops quickly to prevent damage.",
        );
        ny.blank().line(
            "**Chenjezo la Nyengo:** Mvula ikuyembekezeka. \
             Tchani mbewu zakucha msanga kuti zisawonongeke.",
        );
    }

    Body {
        en: en.finish(),
        ny: ny.finish(),
        urgent: rain,
    }
}

pub(super) fn weather(request: &AdviceRequest<'_>) -> Body {
    let Some(weather) = request.weather else {
        return Body {
            en: "Weather data not available. Please check local weather conditions.".to_string(),
            ny: "Zambiri za nyengo sizilipo. Funsani za nyengo m'dera lanu.".to_string(),
            urgent: false,
        };
    };
    let crop = request.crop;
    let mut en = Doc::new();
    let mut ny = Doc::new();

    en.heading(format!("Weather-Based Recommendations for {}:", crop.name_en))
        .blank();
    ny.heading(format!("Malangizo a Nyengo pa {}:", crop.name_ny_or_en()))
        .blank();

    match &request.farmer.region_name {
        Some(region) => {
            en.heading(format!("Current Conditions in {region} ({}):", weather.date));
            ny.heading(format!("Nyengo Yamasiku ano ku {region} ({}):", weather.date));
        }
        None => {
            en.heading(format!("Current Conditions ({}):", weather.date));
            ny.heading(format!("Nyengo Yamasiku ano ({}):", weather.date));
        }
    }
    conditions(&mut en, &mut ny, weather);

    en.blank().heading("Recommendations:");
    ny.blank().heading("Malangizo:");

    if weather.temperature_max > t::WEATHER_HOT_C {
        en.bullet("High temperatures expected. Increase watering and provide shade if possible.");
        ny.bullet("Kutentha kwambiri. Thirirani kawirikawiri ndipo patsani mthunzi ngati n'kotheka.");
    } else if weather.temperature_max < t::WEATHER_COOL_C {
        en.bullet("Cool temperatures. Growth may slow down. Protect sensitive crops.");
        ny.bullet("Kuzizira. Mbewu zitha kukula pang'onopang'ono. Tetezani mbewu zosalimba.");
    }

    if weather.rainfall > t::WEATHER_HEAVY_RAIN_MM {
        en.bullet("Heavy rainfall expected. Ensure good drainage and harvest mature crops.");
        ny.bullet("Mvula yambiri ikuyembekezeka. Onetsetsani kuti madzi akutuluka ndipo tchani mbewu zakucha.");
    } else if weather.rainfall < t::WEATHER_LOW_RAIN_MM {
        en.bullet("Low rainfall. Plan irrigation or wait for better conditions for planting.");
        ny.bullet("Mvula ndi yochepa. Konzekerani kuthirira kapena dikirani nyengo yabwino pobzala.");
    }

    if weather.humidity > t::WEATHER_HUMID_PCT {
        en.bullet("High humidity increases disease risk. Improve ventilation and monitor crops closely.");
        ny.bullet("Chinyezi chambiri chimawonjezera chiopsezo cha matenda. Yang'anirani mbewu mosamala.");
    }

    ny.bullet("Samalani mbewu zanu molingana ndi nyengo");

    Body {
        en: en.finish(),
        ny: ny.finish(),
        urgent: weather_is_severe(weather),
    }
}

fn conditions(en: &mut Doc, ny: &mut Doc, weather: &WeatherSnapshot) {
    en.bullet(format!(
        "Temperature: {}°C - {}°C",
        weather.temperature_min, weather.temperature_max
    ))
    .bullet(format!("Humidity: {}%", weather.humidity))
    .bullet(format!("Rainfall: {}mm", weather.rainfall))
    .bullet(format!("Condition: {}", weather.weather_condition));
    ny.bullet(format!(
        "Kutentha: {}°C - {}°C",
        weather.temperature_min, weather.temperature_max
    ))
    .bullet(format!("Chinyezi: {}%", weather.humidity))
    .bullet(format!("Mvula: {}mm", weather.rainfall))
    .bullet(format!("Nyengo: {}", weather.weather_condition));
}

pub(super) fn general(request: &AdviceRequest<'_>) -> Body {
    let crop = request.crop;
    let mut en = Doc::new();
    let mut ny = Doc::new();

    en.heading(format!("General Farming Tips for {}:", crop.name_en))
        .blank()
        .heading("Best Practices:")
        .bullet("Follow recommended planting dates")
        .bullet("Use quality seeds and planting materials")
        .bullet("Practice proper spacing and planting depth")
        .bullet("Apply fertilizers as recommended")
        .bullet("Control weeds, pests, and diseases promptly")
        .blank()
        .heading("Crop Information:")
        .bullet(format!("Type: {}", crop.crop_type))
        .bullet(format!("Growing period: {} days", crop.growing_period_days))
        .bullet(format!("Water requirement: {}", crop.water_requirement))
        .bullet(format!("Suitable soil: {}", crop.soil_type))
        .blank()
        .heading("Success Tips:")
        .bullet("Keep detailed farming records")
        .bullet("Join farmer groups for shared learning")
        .bullet("Seek advice from extension workers")
        .bullet("Market your produce strategically")
        .bullet("Practice crop rotation for soil health");

    ny.heading(format!("Malangizo Onse a {}:", crop.name_ny_or_en()))
        .blank()
        .heading("Njira Zabwino:")
        .bullet("Tsatirani masiku a kubzala")
        .bullet("Gwiritsani ntchito mbewu zabwino")
        .bullet("Bzalani mbewu molingana")
        .bullet("Gwiritsani ntchito feteleza")
        .bullet("Letsani udzu ndi tizilombo")
        .blank()
        .heading("Zambiri za Mbewu:")
        .bullet(format!("Mtundu: {}", crop.crop_type))
        .bullet(format!("Masiku a kukula: masiku {}", crop.growing_period_days))
        .blank()
        .heading("Malangizo a Chipambano:")
        .bullet("Lembani zonse zimene mukuchita mu munda")
        .bullet("Lowani nawo m'magulu a alimi")
        .bullet("Funsani malangizo kwa aphunzitsi a ulimi");

    Body {
        en: en.finish(),
        ny: ny.finish(),
        urgent: false,
    }
}
