// Prompt template for candidate ranking.
// Placeholders: {persona}, {jd_text}, {special_section}, {resumes_text}, {json_only}.

/// Ranking prompt. Every placeholder is replaced by `build_ranking_prompt`.
pub const RANKING_PROMPT_TEMPLATE: &str = r#"{persona}
Your task is to analyze the following resumes against a job description and rank the candidates
in order of their suitability for the role.

JOB DESCRIPTION:
{jd_text}

{special_section}

CANDIDATE RESUMES:
{resumes_text}

Please analyze each candidate thoroughly and provide a ranked list. For each candidate, provide:
1. A match score from 0-100 (100 being a perfect match)
2. Key strengths that align with the job requirements
3. Notable gaps or concerns
4. A brief overall assessment (2-3 sentences)

Return your response as a valid JSON array (and ONLY the JSON array, no other text) in this exact format:
[
  {
    "rank": 1,
    "name": "Candidate Name",
    "score": 92,
    "strengths": ["strength 1", "strength 2", "strength 3"],
    "gaps": ["gap 1", "gap 2"],
    "assessment": "Brief overall assessment of the candidate.",
    "recommendation": "Highly Recommended"
  }
]

The "recommendation" field should be one of: "Highly Recommended", "Recommended", "Consider", "Not Recommended"

Rank them from highest to lowest score. Be objective, fair, and thorough in your analysis.
{json_only}"#;

/// Section inserted when the recruiter supplied special instructions.
pub const SPECIAL_INSTRUCTIONS_TEMPLATE: &str = r#"
SPECIAL RECRUITER INSTRUCTIONS:
{special_instructions}

Please factor these instructions heavily into your ranking.
"#;
