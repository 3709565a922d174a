//! Challenging problems served when neither bank yields a fresh question.

use rand::seq::SliceRandom;

use super::{Difficulty, Problem, ProblemOrigin};

const CHALLENGING: &[(&str, &str)] = &[
    (
        "Binary Tree Maximum Path Sum",
        "Given a non-empty binary tree, find the maximum path sum. A path is any sequence of \
nodes from some starting node to any node in the tree along parent-child connections.

Example:
Input: [1,2,3] -> Output: 6 (path: 2->1->3)
Input: [-10,9,20,null,null,15,7] -> Output: 42 (path: 15->20->7)

Constraints: Up to 30,000 nodes. Values can be negative.",
    ),
    (
        "Longest Increasing Subsequence",
        "Given an integer array nums, return the length of the longest strictly increasing \
subsequence.

Example:
Input: nums = [10,9,2,5,3,7,101,18]
Output: 4 (subsequence: [2,3,7,101])

Input: nums = [0,1,0,3,2,3]
Output: 4 (subsequence: [0,1,2,3])

Constraints: 1 <= nums.length <= 2500, -10^4 <= nums[i] <= 10^4",
    ),
    (
        "Course Schedule II",
        "There are numCourses courses labeled from 0 to numCourses - 1. You are given a \
prerequisites array where prerequisites[i] = [ai, bi] indicates you must take course bi first \
to take course ai. Return the ordering of courses you should take to finish all courses.

Example:
Input: numCourses = 4, prerequisites = [[1,0],[2,0],[3,1],[3,2]]
Output: [0,2,1,3] (one possible order)

Input: numCourses = 2, prerequisites = [[1,0]]
Output: [0,1]

If it is impossible to finish all courses, return an empty array.",
    ),
    (
        "Edit Distance",
        "Given two strings word1 and word2, return the minimum number of operations required \
to convert word1 to word2. You can insert, delete, or replace any character.

Example:
Input: word1 = \"horse\", word2 = \"ros\"
Output: 3 (horse -> rorse -> rose -> ros)

Input: word1 = \"intention\", word2 = \"execution\"
Output: 5

Constraints: 0 <= word1.length, word2.length <= 500",
    ),
    (
        "Word Ladder",
        "Given two words beginWord and endWord, and a dictionary wordList, return the length \
of the shortest transformation sequence from beginWord to endWord such that only one letter \
can be changed at a time and each transformed word must exist in wordList.

Example:
Input: beginWord = \"hit\", endWord = \"cog\", wordList = [\"hot\",\"dot\",\"dog\",\"lot\",\"log\",\"cog\"]
Output: 5 (\"hit\" -> \"hot\" -> \"dot\" -> \"dog\" -> \"cog\")

Input: beginWord = \"hit\", endWord = \"cog\", wordList = [\"hot\",\"dot\",\"dog\",\"lot\",\"log\"]
Output: 0 (endWord not in wordList)

Constraints: All words have the same length and contain only lowercase letters.",
    ),
    (
        "Serialize and Deserialize Binary Tree",
        "Design an algorithm to serialize and deserialize a binary tree. Serialization \
converts a tree to a string, deserialization converts the string back to the tree.

Example:
Input: root = [1,2,3,null,null,4,5]
You can serialize this to \"1,2,null,null,3,4,null,null,5,null,null\"

There is no restriction on the serialization format. Ensure your algorithm can deserialize \
what it serializes.",
    ),
    (
        "Maximum Product Subarray",
        "Given an integer array nums, find a contiguous non-empty subarray that has the \
largest product, and return the product.

Example:
Input: nums = [2,3,-2,4]
Output: 6 (subarray: [2,3])

Input: nums = [-2,0,-1]
Output: 0

Constraints: 1 <= nums.length <= 2 * 10^4, -10 <= nums[i] <= 10",
    ),
    (
        "Trapping Rain Water",
        "Given n non-negative integers representing an elevation map where the width of each \
bar is 1, compute how much water can be trapped after raining.

Example:
Input: height = [0,1,0,2,1,0,1,3,2,1,2,1]
Output: 6

Input: height = [4,2,0,3,2,5]
Output: 9

Constraints: n == height.length, 1 <= n <= 2 * 10^4",
    ),
];

fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

pub fn challenging_problems() -> Vec<Problem> {
    CHALLENGING
        .iter()
        .map(|(title, description)| {
            let slug = slugify(title);
            Problem {
                id: format!("fallback-{slug}"),
                title: title.to_string(),
                slug: Some(slug),
                difficulty: Difficulty::Hard,
                description: description.to_string(),
                hints: Vec::new(),
                topics: Vec::new(),
                examples: Vec::new(),
                source: ProblemOrigin::FallbackRandom,
                url: None,
                rating: None,
                time_limit: None,
                memory_limit: None,
            }
        })
        .collect()
}

/// A random pool problem whose title is not in `asked_titles`; any pool problem if all were asked.
pub fn random_unasked(asked_titles: &[String]) -> Problem {
    let mut pool = challenging_problems();
    let mut rng = rand::thread_rng();
    pool.shuffle(&mut rng);

    let position = pool
        .iter()
        .position(|p| !asked_titles.contains(&p.title))
        .unwrap_or(0);
    pool.swap_remove(position)
}
