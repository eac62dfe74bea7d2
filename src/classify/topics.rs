//! Topic tables
//!
//! A topic maps a short key (the input file's stem) to the natural-language
//! description the classifier is asked about.

use crate::classify::profiles::MAX_TOPICS;
use crate::config::Config;
use crate::{ConfigError, ConfigResult};
use std::collections::BTreeMap;
use std::str::FromStr;

/// A resolved topic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub key: String,
    pub description: String,
}

/// Built-in topic description sets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicSet {
    /// One-line descriptions
    Small,
    /// Descriptions with examples and Chinese-language terms
    Medium,
    /// Structured profiles listing covered content and sample titles
    Max,
}

impl FromStr for TopicSet {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "max" => Ok(Self::Max),
            other => Err(ConfigError::UnknownTopicSet(other.to_string())),
        }
    }
}

const SMALL_TOPICS: &[(&str, &str)] = &[
    ("drugs", "DRUGS: including illegal drugs, drug abuse, recreational and psychedelic drugs, and related topics."),
    ("tobacco", "TOBACCO: Include vaping and traditional tobacco products, including stores and advocacy."),
    ("weapon", "WEAPONS: Cover BB guns, airsoft, real firearms, as well as other items that can be used to harm others, including but not limited to knives and other melee weapons."),
    ("abortion", "ABORTION: Topics related to abortion, including laws, rights, and advocacy."),
    ("adult", "ADULT: Content related to adult themes, including pornography and adult entertainment."),
    ("alcohol", "ALCOHOL: Topics covering alcoholic beverages, consumption, abuse, and related issues."),
    ("gambling", "GAMBLING: Includes casinos, online gambling, betting, and related activities."),
    ("games", "GAMES: Topics related to video games, board games, and gaming culture."),
    ("lgbt", "LGBT: Topics related to LGBTQ+ rights, advocacy, and community."),
    ("lingerie", "LINGERIE: Content related to lingerie, intimate apparel, and associated topics."),
    ("selfharm", "SELF-HARM: Topics covering self-harm, mental health, and support resources."),
    ("sexedu", "SEX EDUCATION: Topics related to sexual education, health, and awareness."),
    ("violence", "VIOLENCE: Topics covering violent acts, crime, and prevention."),
];

const MEDIUM_TOPICS: &[(&str, &str)] = &[
    ("drugs", "Illegal, recreational, or psychedelic drugs content, including drug abuse, trafficking, production methods, consumption guides, paraphernalia, or glorification of drug use. Includes narcotics, stimulants, marijuana, opioids, and related substances. In Chinese context: 毒品, 大麻, 冰毒, 海洛因, etc."),
    ("tobacco", "Tobacco and nicotine products content, including cigarettes, vaping, e-cigarettes, marketing of tobacco products, or promotion of smoking/vaping. In Chinese context: 香烟, 电子烟, 吸烟, 尼古丁, etc."),
    ("weapon", "Content related to firearms, explosives, knives, or other weapons including sales, manufacturing, modification, or use instructions. Includes combat techniques, ammunition, and weapon accessories. In Chinese context: 武器, 枪支, 刀具, 爆炸物, etc."),
    ("abortion", "Content related to pregnancy termination, including procedures, debates, advocacy, clinics, or self-induced methods. In Chinese context: 堕胎, 人工流产, 终止妊娠, etc."),
    ("adult", "Pornographic or sexually explicit content, adult entertainment, sex work, escort services, or fetish material. Includes sexual content creators, adult venues, and sexually explicit materials. In Chinese context: 色情, 成人内容, 性工作, 情色, etc."),
    ("alcohol", "Content promoting, selling, or discussing alcoholic beverages, including excessive drinking, underage consumption, home brewing, or alcohol abuse. In Chinese context: 酒精, 白酒, 啤酒, 酿酒, 饮酒, etc."),
    ("gambling", "Content related to betting, casinos, lotteries, sports gambling, online gambling platforms, or gambling strategies. Includes poker, slots, and other games of chance for money. In Chinese context: 赌博, 博彩, 彩票, 赌场, 投注, etc."),
    ("games", "Video games, online gaming, esports, gaming communities, or game development content. May include violent games, addiction issues, or gaming monetization. In Chinese context: 游戏, 电竞, 网络游戏, etc."),
    ("lgbt", "Content related to lesbian, gay, bisexual, transgender, queer identities, including LGBTQ+ rights, community issues, relationships, and gender identity topics. In Chinese context: LGBT, 同性恋, 跨性别, 性少数群体, etc."),
    ("lingerie", "Content featuring intimate apparel, underwear in sexualized contexts, or provocative clothing marketed for sexual appeal. In Chinese context: 内衣, 情趣内衣, 性感内衣, etc."),
    ("selfharm", "Content discussing, depicting, or promoting self-injury, suicidal ideation, eating disorders, or other self-destructive behaviors. In Chinese context: 自残, 自伤, 自杀, 厌食症, etc."),
    ("sexedu", "Sexual education content including reproductive health, contraception, STIs, sexual development, anatomy, and related health topics. In Chinese context: 性教育, 避孕, 性健康, 性传播疾病, etc."),
    ("violence", "Content depicting, promoting, or providing instructions for physical harm, fighting, abuse, torture, or graphic injuries. Includes violent extremism, terrorism, or assault. In Chinese context: 暴力, 斗殴, 虐待, 恐怖主义, etc."),
];

/// Mapping from topic key to description
///
/// The table is built once at startup and shared read-only by all tasks.
#[derive(Debug, Clone, Default)]
pub struct TopicTable {
    topics: BTreeMap<String, String>,
}

impl TopicTable {
    /// Creates an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table holding one of the built-in sets
    pub fn builtin(set: TopicSet) -> Self {
        let topics = match set {
            TopicSet::Small => flat_entries(SMALL_TOPICS),
            TopicSet::Medium => flat_entries(MEDIUM_TOPICS),
            TopicSet::Max => MAX_TOPICS
                .iter()
                .map(|profile| (profile.key.to_string(), profile.render()))
                .collect(),
        };

        Self { topics }
    }

    /// Builds the table described by the configuration
    ///
    /// Starts from the configured built-in set, then applies the `[topics]`
    /// section, which may add keys or replace built-in descriptions.
    pub fn from_config(config: &Config) -> ConfigResult<Self> {
        let set: TopicSet = config.classifier.topic_set.parse()?;
        let mut table = Self::builtin(set);
        for (key, description) in &config.topics {
            table.insert(key, description);
        }
        Ok(table)
    }

    /// Adds or replaces a topic
    pub fn insert(&mut self, key: impl Into<String>, description: impl Into<String>) {
        self.topics.insert(key.into(), description.into());
    }

    /// Resolves a topic key
    pub fn get(&self, key: &str) -> Option<Topic> {
        self.topics.get(key).map(|description| Topic {
            key: key.to_string(),
            description: description.clone(),
        })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.topics.contains_key(key)
    }

    /// Returns the known keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.topics.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

fn flat_entries(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(key, description)| (key.to_string(), description.to_string()))
        .collect()
}
