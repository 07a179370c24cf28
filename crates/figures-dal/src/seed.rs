//! Demo catalogue loaded when no seed file is given.
use figures_types::{FieldOfActivity, Gender, Status};
use time::{OffsetDateTime, macros::datetime};

use crate::character::Character;

struct Seed {
    id: &'static str,
    name: &'static str,
    birth: &'static str,
    death: &'static str,
    field: FieldOfActivity,
    biography: &'static str,
    works: &'static [&'static str],
    likes: u32,
    avatar: &'static str,
    texts: &'static [&'static str],
    audios: &'static [&'static str],
    created: OffsetDateTime,
}

const SEEDS: &[Seed] = &[
    Seed {
        id: "1",
        name: "حافظ شیرازی",
        birth: "۱۳۲۵",
        death: "۱۳۹۰",
        field: FieldOfActivity::Poet,
        biography: "خواجه شمس‌الدین محمد حافظ شیرازی، معروف به حافظ، شاعر بزرگ قرن هشتم هجری و از مفاخر ادب فارسی است.",
        works: &["دیوان حافظ", "غزلیات"],
        likes: 245,
        avatar: "/placeholder-m0wag.png",
        texts: &["دیوان-حافظ.pdf", "تفسیر-غزلیات.pdf"],
        audios: &["غزل-حافظ-1.mp3"],
        created: datetime!(2024-01-15 10:00 UTC),
    },
    Seed {
        id: "2",
        name: "فردوسی",
        birth: "۹۴۰",
        death: "۱۰۲۰",
        field: FieldOfActivity::Poet,
        biography: "ابوالقاسم فردوسی توسی، شاعر بزرگ ایرانی و سراینده شاهنامه، حماسه ملی ایران.",
        works: &["شاهنامه"],
        likes: 189,
        avatar: "/placeholder-quc81.png",
        texts: &["شاهنامه-فردوسی.pdf"],
        audios: &[],
        created: datetime!(2024-01-10 09:00 UTC),
    },
    Seed {
        id: "3",
        name: "عمر خیام",
        birth: "۱۰۴۸",
        death: "۱۱۳۱",
        field: FieldOfActivity::Astronomer,
        biography: "غیاث‌الدین ابوالفتح عمر بن ابراهیم خیام نیشابوری، ریاضی‌دان، منجم، فیلسوف و شاعر ایرانی.",
        works: &["رباعیات خیام", "رساله در جبر و مقابله"],
        likes: 156,
        avatar: "/placeholder-77lhd.png",
        texts: &["رباعیات-خیام.pdf", "ریاضیات-خیام.pdf"],
        audios: &["رباعی-خیام.mp3"],
        created: datetime!(2024-01-12 11:00 UTC),
    },
    Seed {
        id: "4",
        name: "مولانا جلال‌الدین رومی",
        birth: "۱۲۰۷",
        death: "۱۲۷۳",
        field: FieldOfActivity::Mystic,
        biography: "جلال‌الدین محمد بلخی معروف به مولوی، عارف و شاعر بزرگ قرن هفتم هجری.",
        works: &["مثنوی معنوی", "دیوان شمس", "فیه ما فیه"],
        likes: 298,
        avatar: "/rumi-persian-sufi-poet.jpg",
        texts: &["مثنوی-مولوی.pdf", "دیوان-شمس.pdf"],
        audios: &["مثنوی-صوتی.mp3"],
        created: datetime!(2024-01-08 14:00 UTC),
    },
    Seed {
        id: "5",
        name: "سعدی شیرازی",
        birth: "۱۲۱۰",
        death: "۱۲۹۱",
        field: FieldOfActivity::Poet,
        biography: "مصلح‌الدین بن عبدالله شیرازی معروف به سعدی، از بزرگترین شاعران و نویسندگان ادب فارسی.",
        works: &["گلستان", "بوستان", "دیوان سعدی"],
        likes: 167,
        avatar: "/saadi-persian-poet.jpg",
        texts: &["گلستان-سعدی.pdf", "بوستان-سعدی.pdf"],
        audios: &[],
        created: datetime!(2024-01-14 16:00 UTC),
    },
    Seed {
        id: "6",
        name: "ابن سینا",
        birth: "۹۸۰",
        death: "۱۰۳۷",
        field: FieldOfActivity::Philosopher,
        biography: "ابوعلی حسین بن عبدالله بن سینا، فیلسوف، پزشک و دانشمند بزرگ ایرانی.",
        works: &["قانون در طب", "الشفاء", "الاشارات والتنبیهات"],
        likes: 134,
        avatar: "/avicenna-persian-philosopher.jpg",
        texts: &["قانون-ابن-سینا.pdf"],
        audios: &[],
        created: datetime!(2024-01-11 13:00 UTC),
    },
];

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn seed_characters() -> Vec<Character> {
    SEEDS
        .iter()
        .map(|s| Character {
            id: s.id.to_string(),
            name: s.name.to_string(),
            gender: Gender::Male,
            birth_date: s.birth.to_string(),
            death_date: Some(s.death.to_string()),
            field_of_activity: s.field,
            status: Status::Active,
            biography: Some(s.biography.to_string()),
            works: strings(s.works),
            likes: s.likes,
            avatar: Some(s.avatar.to_string()),
            text_resources: strings(s.texts),
            audio_resources: strings(s.audios),
            created_at: s.created,
            updated_at: s.created,
        })
        .collect()
}
