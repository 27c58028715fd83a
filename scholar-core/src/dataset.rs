//! Embedded sample catalog used before, or instead of, the remote feed.

use crate::types::{Author, FilterCategory, FilterOption, Paper};

/// Category id for conference filters.
pub const CONFERENCE: &str = "conference";
/// Category id for publication-year filters.
pub const YEAR: &str = "year";
/// Category id for topic filters.
pub const TOPIC: &str = "topic";

#[allow(clippy::too_many_arguments)]
fn sample(
    id: &str,
    title: &str,
    authors: Vec<Author>,
    abstract_text: &str,
    publish_date: &str,
    conference: Option<&str>,
    journal: Option<&str>,
    citations: u32,
    tags: &[&str],
    image: &str,
) -> Paper {
    Paper {
        id: id.to_string(),
        title: title.to_string(),
        authors,
        abstract_text: abstract_text.to_string(),
        publish_date: publish_date.to_string(),
        conference: conference.map(str::to_string),
        journal: journal.map(str::to_string),
        citations,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        url: format!("https://example.com/paper{}", id),
        image_url: Some(format!(
            "https://images.unsplash.com/photo-{}?auto=format&fit=crop&w=500&h=300",
            image
        )),
        arxiv_id: None,
        pdf_url: None,
        primary_category: None,
    }
}

/// The five built-in sample papers.
pub fn sample_papers() -> Vec<Paper> {
    vec![
        sample(
            "1",
            "Vision Transformer for Small-Size Datasets",
            vec![
                Author::new("1", "Kai Han").with_institution("University of Oxford"),
                Author::new("2", "Yunhe Wang").with_institution("Huawei Noah's Ark Lab"),
                Author::new("3", "Jianyuan Guo").with_institution("Peking University"),
            ],
            "Vision Transformer (ViT) has achieved remarkable success in computer vision tasks. \
             However, its performance heavily depends on sufficient data for training. When the \
             training dataset is small, ViT often underperforms compared to CNNs due to the lack \
             of inductive bias. This paper presents a new architecture that adapts Vision \
             Transformers for small-size datasets.",
            "2023-10-15",
            Some("CVPR"),
            None,
            145,
            &["vision transformer", "small datasets", "transfer learning"],
            "1487058792275-0ad4aaf24ca7",
        ),
        sample(
            "2",
            "Real-time Object Detection with Sparse Attention",
            vec![
                Author::new("4", "Jingdong Wang").with_institution("Microsoft Research"),
                Author::new("5", "Ke Sun").with_institution("Tsinghua University"),
            ],
            "Object detection in real-time remains a challenging task, especially on \
             resource-constrained devices. We propose a novel approach using sparse attention \
             mechanisms to significantly reduce computational complexity while maintaining high \
             detection accuracy.",
            "2023-09-18",
            Some("ICCV"),
            None,
            89,
            &["object detection", "real-time", "sparse attention"],
            "1461749280684-dccba630e2f6",
        ),
        sample(
            "3",
            "Self-Supervised Learning for Medical Image Segmentation",
            vec![
                Author::new("6", "Emma Johnson").with_institution("Stanford University"),
                Author::new("7", "Michael Zhang").with_institution("MIT"),
            ],
            "Medical image segmentation often suffers from limited labeled data. We introduce a \
             self-supervised pre-training approach that leverages large amounts of unlabeled \
             medical images to improve segmentation accuracy on downstream tasks with limited \
             supervision.",
            "2023-08-05",
            None,
            Some("Medical Image Analysis"),
            112,
            &["medical imaging", "segmentation", "self-supervised learning"],
            "1581091226825-a6a2a5aee158",
        ),
        sample(
            "4",
            "Contrastive Learning of Visual Representations",
            vec![
                Author::new("8", "Chen Sun").with_institution("Google Research"),
                Author::new("9", "Abhinav Gupta").with_institution("Carnegie Mellon University"),
            ],
            "We present a contrastive approach for self-supervised learning of visual \
             representations. Our framework maximizes agreement between differently augmented \
             views of the same image via a contrastive loss in the latent space, resulting in \
             representations that outperform supervised pre-training on many downstream tasks.",
            "2023-07-20",
            Some("NeurIPS"),
            None,
            320,
            &["contrastive learning", "self-supervised", "representation learning"],
            "1518770660439-4636190af475",
        ),
        sample(
            "5",
            "3D Scene Understanding with Neural Implicit Representations",
            vec![
                Author::new("10", "Sarah Parker").with_institution("ETH Zurich"),
                Author::new("11", "Alex Rodriguez").with_institution("UC Berkeley"),
            ],
            "Neural implicit representations have emerged as a powerful paradigm for 3D scene \
             reconstruction and understanding. We propose a novel architecture that efficiently \
             learns continuous implicit fields from sparse observations, enabling high-quality \
             3D reconstruction and semantic understanding of complex scenes.",
            "2023-11-02",
            Some("ECCV"),
            None,
            76,
            &["3D reconstruction", "neural implicit fields", "scene understanding"],
            "1498050108023-c5249f4df085",
        ),
    ]
}

/// The built-in filter categories: conference, year, and topic.
pub fn filter_categories() -> Vec<FilterCategory> {
    vec![
        FilterCategory {
            id: CONFERENCE.to_string(),
            name: "Conference".to_string(),
            options: vec![
                FilterOption::new("cvpr", "CVPR"),
                FilterOption::new("iccv", "ICCV"),
                FilterOption::new("eccv", "ECCV"),
                FilterOption::new("neurips", "NeurIPS"),
            ],
        },
        FilterCategory {
            id: YEAR.to_string(),
            name: "Year".to_string(),
            options: vec![
                FilterOption::new("2023", "2023"),
                FilterOption::new("2022", "2022"),
                FilterOption::new("2021", "2021"),
            ],
        },
        FilterCategory {
            id: TOPIC.to_string(),
            name: "Topic".to_string(),
            options: vec![
                FilterOption::new("transformers", "Transformers"),
                FilterOption::new("object-detection", "Object Detection"),
                FilterOption::new("segmentation", "Segmentation"),
                FilterOption::new("self-supervised", "Self-Supervised Learning"),
                FilterOption::new("3d", "3D Vision"),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sample_papers_have_unique_ids() {
        let papers = sample_papers();
        assert_eq!(papers.len(), 5);
        let ids: HashSet<_> = papers.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.len(), papers.len());
    }

    #[test]
    fn test_sample_abstracts_are_single_spaced() {
        for paper in sample_papers() {
            assert!(!paper.abstract_text.contains("  "), "{}", paper.id);
        }
    }

    #[test]
    fn test_filter_categories_shape() {
        let categories = filter_categories();
        let ids: Vec<_> = categories.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec![CONFERENCE, YEAR, TOPIC]);
        assert_eq!(categories[2].options.len(), 5);
        assert_eq!(
            categories[2].option("object-detection").unwrap().label,
            "Object Detection"
        );
    }
}
