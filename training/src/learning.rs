//! Curated instructional clips by professional players.

use crate::model::ShotType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LearningClip {
    pub shot: ShotType,
    pub description: &'static str,
    pub youtube_id: &'static str,
}

impl LearningClip {
    pub fn embed_url(&self) -> String {
        format!("https://www.youtube.com/embed/{}", self.youtube_id)
    }

    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.youtube_id)
    }
}

pub const CATALOG: &[LearningClip] = &[
    LearningClip {
        shot: ShotType::Bandeja,
        description: "Paquito Navarro's bandeja: side-on preparation, high contact point and a controlled finish.",
        youtube_id: "h9tLaTq92Bc",
    },
    LearningClip {
        shot: ShotType::Smash,
        description: "Ale Galán's smash over three metres: the jump, full arm extension and reaching for the highest point.",
        youtube_id: "7Q_8Z7gJkYk",
    },
    LearningClip {
        shot: ShotType::Vibora,
        description: "Sanyo Gutiérrez's víbora, a sliced shot with side spin. The key is brushing the side of the ball.",
        youtube_id: "V0csm_Tz5P4",
    },
    LearningClip {
        shot: ShotType::WallRebound,
        description: "Fernando Belasteguín's forehand off the back wall: wait for the bounce and attack the ball at its peak.",
        youtube_id: "U_5A_d-e8fA",
    },
    LearningClip {
        shot: ShotType::Volley,
        description: "Agustín Tapia's forehand and backhand volleys: short, compact and driven by body weight.",
        youtube_id: "G1wA9qI2x_8",
    },
    LearningClip {
        shot: ShotType::Lob,
        description: "Juan Lebrón on the lob: bend the legs and finish upwards.",
        youtube_id: "Jg6vLz4X5hE",
    },
];

/// Clips for one shot, in catalog order.
pub fn clips_for(shot: ShotType) -> impl Iterator<Item = &'static LearningClip> {
    CATALOG.iter().filter(move |clip| clip.shot == shot)
}
